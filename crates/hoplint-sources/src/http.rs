//! reqwest-backed prober.
//!
//! Two clients are held: one with redirects disabled so individual hops can
//! be observed, and one with the default policy for "where does this end
//! up" probes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::probe::{ProbeError, ProbeResponse, Prober};

/// Settings for the HTTP prober.
#[derive(Debug, Clone)]
pub struct HttpProberOptions {
    pub timeout: Duration,
    /// Extra attempts after a transport failure. HTTP error statuses are
    /// answers, not failures, and are never retried.
    pub retries: u32,
    pub user_agent: String,
}

impl Default for HttpProberOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 0,
            user_agent: format!("hoplint/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HEAD prober over reqwest.
pub struct HttpProber {
    single: reqwest::Client,
    following: reqwest::Client,
    retries: u32,
}

impl HttpProber {
    pub fn new(options: &HttpProberOptions) -> anyhow::Result<Self> {
        let single = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .redirect(Policy::none())
            .build()?;
        let following = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            single,
            following,
            retries: options.retries,
        })
    }

    async fn head_with(
        &self,
        client: &reqwest::Client,
        url: &Url,
    ) -> Result<ProbeResponse, ProbeError> {
        let mut attempt = 0;
        loop {
            match client.head(url.clone()).send().await {
                Ok(response) => {
                    let location = response
                        .headers()
                        .get(reqwest::header::LOCATION)
                        .and_then(|value| value.to_str().ok())
                        .map(|value| value.to_string());

                    return Ok(ProbeResponse {
                        status: response.status().as_u16(),
                        location,
                        final_url: response.url().to_string(),
                    });
                }
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    debug!(
                        "retrying HEAD {} after transport error (attempt {}/{}): {}",
                        url, attempt, self.retries, err
                    );
                }
                Err(err) => {
                    return Err(ProbeError::Transport {
                        url: url.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn head(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        self.head_with(&self.single, url).await
    }

    async fn head_following(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        self.head_with(&self.following, url).await
    }
}
