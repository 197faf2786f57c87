//! Probing trait

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// What a single HEAD request observed.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP status of the response.
    pub status: u16,
    /// Raw `Location` header, when present.
    pub location: Option<String>,
    /// URL the response came from; differs from the requested URL when the
    /// client followed redirects on the way.
    pub final_url: String,
}

impl ProbeResponse {
    /// The redirect target, when this response is a redirect that names one.
    pub fn redirect_location(&self) -> Option<&str> {
        if (300..400).contains(&self.status) {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// Probe failures that never produced an HTTP response.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

/// A client able to issue HEAD probes against the audited site.
#[async_trait]
pub trait Prober: Send + Sync {
    /// One HEAD request; redirects are reported, not followed.
    async fn head(&self, url: &Url) -> Result<ProbeResponse, ProbeError>;

    /// HEAD request letting the client follow redirects; reports the final
    /// response of the chain.
    async fn head_following(&self, url: &Url) -> Result<ProbeResponse, ProbeError>;
}
