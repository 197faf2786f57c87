//! In-memory site model used by the flow tests.

// Each test binary compiles its own copy of this module and uses a
// different slice of it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hoplint_sources::{ProbeError, ProbeResponse, Prober};
use url::Url;

/// One scripted response.
#[derive(Clone)]
pub enum Page {
    /// Respond with this status and optional `Location`.
    Respond {
        status: u16,
        location: Option<String>,
    },
    /// Fail at the transport level.
    Fail(String),
}

impl Page {
    pub fn ok() -> Self {
        Page::Respond {
            status: 200,
            location: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Page::Respond {
            status,
            location: None,
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Page::Respond {
            status,
            location: Some(location.to_string()),
        }
    }
}

/// Prober that replays scripted responses and records every request.
///
/// Each URL carries a sequence of responses; requests past the end repeat
/// the last one, so a single-entry sequence behaves like a static server.
/// Unknown URLs fail like an unreachable host.
pub struct ScriptedProber {
    pages: HashMap<String, Vec<Page>>,
    served: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<(&'static str, String)>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            served: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), vec![page]);
        self
    }

    pub fn page_sequence(mut self, url: &str, pages: Vec<Page>) -> Self {
        self.pages.insert(url.to_string(), pages);
        self
    }

    /// Whether a request of the given method ever hit the given URL.
    pub fn requested(&self, method: &str, url: &str) -> bool {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .any(|(m, u)| *m == method && u == url)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn serve(&self, method: &'static str, url: &str) -> Result<ProbeResponse, ProbeError> {
        self.requests
            .lock()
            .unwrap()
            .push((method, url.to_string()));

        let Some(sequence) = self.pages.get(url) else {
            return Err(ProbeError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        };

        let mut served = self.served.lock().unwrap();
        let calls = served.entry(url.to_string()).or_insert(0);
        let page = sequence[(*calls).min(sequence.len() - 1)].clone();
        *calls += 1;
        drop(served);

        match page {
            Page::Respond { status, location } => Ok(ProbeResponse {
                status,
                location,
                final_url: url.to_string(),
            }),
            Page::Fail(message) => Err(ProbeError::Transport {
                url: url.to_string(),
                message,
            }),
        }
    }

    fn follow_from(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        let mut current = url.clone();
        // reqwest gives up after 10 redirects by default.
        for _ in 0..10 {
            let response = self.serve("follow", current.as_str())?;
            let redirect = response.redirect_location().map(|l| l.to_string());
            match redirect {
                Some(location) => {
                    current = Url::parse(&location)
                        .or_else(|_| current.join(&location))
                        .expect("scripted Location must resolve");
                }
                None => {
                    return Ok(ProbeResponse {
                        final_url: current.to_string(),
                        ..response
                    });
                }
            }
        }

        Err(ProbeError::Transport {
            url: url.to_string(),
            message: "too many redirects".to_string(),
        })
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn head(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        self.serve("head", url.as_str())
    }

    async fn head_following(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        self.follow_from(url)
    }
}
