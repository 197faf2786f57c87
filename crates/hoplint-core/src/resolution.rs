//! Probe outcomes and per-rule resolution results.

use serde::{Deserialize, Serialize};

/// Hard cap on redirect hops traversed while tracing a chain.
pub const MAX_REDIRECT_HOPS: u32 = 5;

/// Hops tolerated before a working chain is flagged as too long.
pub const TOLERATED_REDIRECT_HOPS: u32 = 1;

/// Outcome of probing a URL.
///
/// Transport failures are their own variant rather than a sentinel status
/// code, so a genuine 4xx/5xx served by the site is never conflated with
/// "the request never got an answer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// HTTP status of the final response.
    Http(u16),
    /// No HTTP response at all (DNS, connect, TLS or timeout failure).
    TransportFailed,
}

impl ProbeStatus {
    /// Status code, when an HTTP response was received.
    pub fn code(self) -> Option<u16> {
        match self {
            ProbeStatus::Http(code) => Some(code),
            ProbeStatus::TransportFailed => None,
        }
    }

    /// 2xx response.
    pub fn is_success(self) -> bool {
        matches!(self, ProbeStatus::Http(code) if (200..300).contains(&code))
    }

    /// 4xx/5xx response, or no response at all.
    pub fn is_error(self) -> bool {
        match self {
            ProbeStatus::Http(code) => code >= 400,
            ProbeStatus::TransportFailed => true,
        }
    }
}

/// What the live site actually did for one declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Fully-qualified source that was probed.
    pub source_url: String,
    /// Fully-qualified destination the declaration expects.
    pub destination_url: String,
    /// Where the source actually ended up.
    pub final_url: String,
    pub status: ProbeStatus,
    /// A redirect was observed and it did not lead straight back to the
    /// source.
    pub was_redirected: bool,
    /// Redirect hops observed, capped at [`MAX_REDIRECT_HOPS`].
    pub hop_count: u32,
    /// `final_url` is equivalent to `destination_url`.
    pub matches_destination: bool,
    /// URLs visited while tracing, starting at the source.
    pub chain: Vec<String>,
    /// Present when the probe failed or the chain ended in an HTTP error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolutionResult {
    /// Result for a probe that never produced an HTTP response.
    pub fn transport_failed(
        source_url: String,
        destination_url: String,
        message: impl Into<String>,
    ) -> Self {
        Self {
            final_url: source_url.clone(),
            chain: vec![source_url.clone()],
            source_url,
            destination_url,
            status: ProbeStatus::TransportFailed,
            was_redirected: false,
            hop_count: 0,
            matches_destination: false,
            error: Some(message.into()),
        }
    }
}
