//! Declared redirect rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::urlnorm;

/// One entry of the redirect declaration, as published by the site.
///
/// Declarations in the wild use either capitalized or lowercase keys; both
/// spellings are accepted, and a missing field becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredRedirect {
    #[serde(default, alias = "Source")]
    pub source: String,
    #[serde(default, alias = "Destination")]
    pub destination: String,
}

/// A declared redirect after ingestion, with the flags classification needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Declared source, exactly as published.
    pub source_path: String,
    /// Declared destination, exactly as published.
    pub destination_path: String,
    /// An earlier rule in the sorted declaration shares this source.
    pub is_duplicate_source: bool,
    /// 0 for the first occurrence of a source, 1 for the second, and so on.
    pub duplicate_ordinal: u32,
    /// The source is a fully-qualified URL instead of a site-relative path.
    pub is_over_qualified: bool,
    /// Source and destination are equivalent, so the rule cannot move anyone.
    pub has_identical_endpoints: bool,
}

impl RedirectRule {
    /// Ingest declaration entries into rules.
    ///
    /// Entries are sorted by source first, so duplicate ordinals are
    /// deterministic no matter how the declaration orders its entries.
    pub fn from_entries(mut entries: Vec<DeclaredRedirect>) -> Vec<RedirectRule> {
        entries.sort_by(|a, b| a.source.cmp(&b.source));

        let mut occurrences: HashMap<String, u32> = HashMap::new();
        entries
            .into_iter()
            .map(|entry| {
                let seen = occurrences.entry(entry.source.clone()).or_insert(0);
                let ordinal = *seen;
                *seen += 1;

                RedirectRule {
                    is_duplicate_source: ordinal > 0,
                    duplicate_ordinal: ordinal,
                    is_over_qualified: urlnorm::is_fully_qualified(&entry.source),
                    has_identical_endpoints: urlnorm::equivalent(
                        &entry.source,
                        &entry.destination,
                    ),
                    source_path: entry.source,
                    destination_path: entry.destination,
                }
            })
            .collect()
    }
}
