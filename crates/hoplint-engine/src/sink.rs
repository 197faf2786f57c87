//! Downstream suggestion delivery.

use async_trait::async_trait;
use hoplint_core::{Issue, PackedSuggestionSet};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Builds the key under which one suggestion is synced.
pub type KeyBuilder = dyn Fn(&Issue) -> String + Send + Sync;

/// Destination for the packed suggestion payload.
///
/// The audit does not define a persisted schema; a sink receives the packed
/// set plus a stable key per issue and maps both onto whatever its backend
/// needs.
#[async_trait]
pub trait SuggestionSink: Send + Sync {
    async fn sync(&self, set: &PackedSuggestionSet, key_of: &KeyBuilder) -> anyhow::Result<()>;
}

/// Sink that writes one JSON object per suggestion, line by line.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Hand the writer back, for callers that need to inspect or close it.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> SuggestionSink for JsonLinesSink<W> {
    async fn sync(&self, set: &PackedSuggestionSet, key_of: &KeyBuilder) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().await;
        for issue in &set.issues {
            let line = serde_json::json!({
                "key": key_of(issue),
                "issue": issue,
            });
            writer
                .write_all(serde_json::to_string(&line)?.as_bytes())
                .await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
        Ok(())
    }
}
