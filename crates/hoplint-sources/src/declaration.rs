//! Redirect-declaration fetching.
//!
//! The audited site publishes its declared redirects as JSON at a
//! well-known path. Failures at this boundary degrade to an empty rule
//! list: "no declared redirects" and "declaration unavailable" are
//! indistinguishable to the rest of the audit, which simply has nothing to
//! check.

use std::time::Duration;

use async_trait::async_trait;
use hoplint_core::{DeclaredRedirect, RedirectRule};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Well-known path serving the redirect declaration.
pub const DEFAULT_DECLARATION_PATH: &str = "/redirects.json";

/// Shape of the declaration document.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationDoc {
    #[serde(default)]
    pub data: Vec<DeclaredRedirect>,
    #[serde(default)]
    pub total: u64,
}

impl DeclarationDoc {
    /// The document claims more (or fewer) entries than it carries, so it
    /// should be refetched with an explicit `?limit=` of the claimed total.
    pub fn needs_limit_retry(&self) -> bool {
        self.data.len() as u64 != self.total
    }
}

/// Where declared rules come from.
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Declared rules for a site; failures degrade to an empty list.
    async fn fetch_rules(&self, base: &Url) -> Vec<RedirectRule>;
}

/// Fetches the declaration document over HTTP.
pub struct DeclarationClient {
    client: reqwest::Client,
    path: String,
}

impl DeclarationClient {
    pub fn new(
        path: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            path: path.into(),
        })
    }

    async fn fetch_doc(&self, url: Url) -> Option<DeclarationDoc> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("failed to fetch redirect declaration from {}: {}", url, err);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "redirect declaration at {} returned HTTP {}",
                url,
                response.status().as_u16()
            );
            return None;
        }

        match response.json::<DeclarationDoc>().await {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!("failed to parse redirect declaration from {}: {}", url, err);
                None
            }
        }
    }
}

/// URL for the follow-up fetch, asking for the claimed total outright.
fn limit_retry_url(url: &Url, total: u64) -> Url {
    let mut retry = url.clone();
    retry.set_query(Some(&format!("limit={}", total)));
    retry
}

/// Pick the document to ingest. A complete original stands as-is; a
/// truncated one is replaced by the retried fetch when that carries any
/// data, and dropped entirely when it does not.
fn select_document(
    original: DeclarationDoc,
    retried: Option<DeclarationDoc>,
) -> Option<DeclarationDoc> {
    if !original.needs_limit_retry() {
        return Some(original);
    }
    match retried {
        Some(doc) if !doc.data.is_empty() => Some(doc),
        _ => None,
    }
}

#[async_trait]
impl RuleSource for DeclarationClient {
    async fn fetch_rules(&self, base: &Url) -> Vec<RedirectRule> {
        let Ok(url) = base.join(&self.path) else {
            warn!(
                "could not build declaration URL from {} and {}",
                base, self.path
            );
            return Vec::new();
        };

        let Some(doc) = self.fetch_doc(url.clone()).await else {
            return Vec::new();
        };

        let retried = if doc.needs_limit_retry() {
            debug!(
                "declaration carries {} of {} claimed entries, refetching with an explicit limit",
                doc.data.len(),
                doc.total
            );
            self.fetch_doc(limit_retry_url(&url, doc.total)).await
        } else {
            None
        };

        let Some(doc) = select_document(doc, retried) else {
            warn!("declaration limit retry yielded no usable data");
            return Vec::new();
        };

        RedirectRule::from_entries(doc.data)
    }
}
