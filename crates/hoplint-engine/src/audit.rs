//! Audit runner: fetch declared rules, resolve, classify, pack.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use hoplint_core::{Error, IssueKind, PackedSuggestionSet, analyze, fit_into_budget};
use hoplint_sources::{Prober, RuleSource};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;
use url::Url;

use crate::resolver::{self, ResolveOptions};

/// Settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub resolve: ResolveOptions,
    /// Byte budget for the packed suggestion payload.
    pub budget_bytes: usize,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            resolve: ResolveOptions::default(),
            budget_bytes: hoplint_core::DEFAULT_SUGGESTION_BUDGET_BYTES,
        }
    }
}

/// Terminal outcome of one audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub id: String,
    pub base_url: String,
    /// Declared rules audited.
    pub rules_total: usize,
    /// Rules per category, including `ok`.
    pub counts: BTreeMap<IssueKind, usize>,
    /// Problem issues packed to the byte budget.
    pub suggestions: PackedSuggestionSet,
    pub elapsed_ms: u64,
    #[serde(with = "time::serde::timestamp")]
    pub finished_at: OffsetDateTime,
}

/// Redirect audit over one site.
pub struct RedirectAudit {
    prober: Arc<dyn Prober>,
    rules: Arc<dyn RuleSource>,
    options: AuditOptions,
}

impl RedirectAudit {
    pub fn new(
        prober: Arc<dyn Prober>,
        rules: Arc<dyn RuleSource>,
        options: AuditOptions,
    ) -> Self {
        Self {
            prober,
            rules,
            options,
        }
    }

    /// Audit every declared redirect of `base_url`.
    ///
    /// An unparseable base URL is the only run-level failure; everything
    /// downstream degrades to data on the report.
    pub async fn run(&self, base_url: &str) -> Result<AuditReport> {
        let start = Instant::now();
        let base = Url::parse(base_url)
            .map_err(|err| Error::InvalidBaseUrl(format!("{}: {}", base_url, err)))?;

        // 1. Declared rules (empty on any declaration failure)
        let rules = self.rules.fetch_rules(&base).await;
        info!("auditing {} declared redirects for {}", rules.len(), base);

        // 2. Live resolution
        let results =
            resolver::resolve_all(self.prober.as_ref(), &base, &rules, &self.options.resolve)
                .await;

        // 3. Classification
        let analysis = analyze(&rules, &results);
        let problems = analysis.problems();
        info!(
            "classified {} rules, {} need attention",
            analysis.issues.len(),
            problems.len()
        );

        // 4. Packing
        let suggestions = fit_into_budget(&problems, self.options.budget_bytes);

        Ok(AuditReport {
            id: uuid::Uuid::new_v4().to_string(),
            base_url: base.to_string(),
            rules_total: rules.len(),
            counts: analysis.counts,
            suggestions,
            elapsed_ms: start.elapsed().as_millis() as u64,
            finished_at: OffsetDateTime::now_utc(),
        })
    }
}
