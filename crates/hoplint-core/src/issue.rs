//! Issue categories and audited-rule records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RedirectRule, ResolutionResult};

/// Problem category assigned to one audited rule.
///
/// Declaration order is priority order: when several categories apply, the
/// rule gets the first one listed here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// The same source is declared more than once.
    DuplicateSource,
    /// The source is declared as a fully-qualified URL instead of a path.
    OverQualified,
    /// Source and destination are the same place.
    IdenticalEndpoints,
    /// The probe failed, or the chain ended in a 4xx/5xx.
    HttpError,
    /// The source redirects back to itself.
    RedirectsToSelf,
    /// The chain works but lands somewhere other than the declared
    /// destination.
    DestinationMismatch,
    /// The chain reaches the declared destination in too many hops.
    TooManyRedirects,
    /// Nothing wrong.
    Ok,
}

impl IssueKind {
    /// Everything except `Ok`.
    pub fn is_problem(self) -> bool {
        self != IssueKind::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::DuplicateSource => "duplicate-source",
            IssueKind::OverQualified => "over-qualified",
            IssueKind::IdenticalEndpoints => "identical-endpoints",
            IssueKind::HttpError => "http-error",
            IssueKind::RedirectsToSelf => "redirects-to-self",
            IssueKind::DestinationMismatch => "destination-mismatch",
            IssueKind::TooManyRedirects => "too-many-redirects",
            IssueKind::Ok => "ok",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audited rule: what was declared, what the site did, and the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub rule: RedirectRule,
    pub resolution: ResolutionResult,
}

impl Issue {
    /// Serialized size used for budget accounting. An unserializable issue
    /// counts as zero bytes rather than failing the audit.
    pub fn serialized_size(&self) -> usize {
        serde_json::to_string(self).map(|json| json.len()).unwrap_or(0)
    }

    /// Stable key under which downstream stores the suggestion for this
    /// issue.
    pub fn suggestion_key(&self) -> String {
        format!("{}:{}", self.kind, self.rule.source_path)
    }
}
