//! Built-in submission sinks

use super::record::SubmissionRecord;
use super::traits::SubmissionSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Logs each record and keeps its JSON for printing once the terminal is restored
#[derive(Debug, Default)]
pub struct LogSink {
    delivered: Mutex<Vec<String>>,
}

impl LogSink {
    /// Drain the records delivered so far, oldest first, as pretty JSON
    pub fn take_delivered(&self) -> Vec<String> {
        self.delivered
            .lock()
            .map(|mut delivered| std::mem::take(&mut *delivered))
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        tracing::info!(
            id = record.id(),
            wizard = record.wizard(),
            fields = record.fields().len(),
            summary = ?record.summary(),
            "submission received"
        );
        self.delivered
            .lock()
            .map_err(|_| anyhow::anyhow!("log sink lock poisoned"))?
            .push(json);
        Ok(())
    }
}

/// Appends one JSON line per record to an outbox file
#[derive(Debug, Clone)]
pub struct JsonlFileSink {
    path: PathBuf,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SubmissionSink for JsonlFileSink {
    fn name(&self) -> &str {
        "outbox"
    }

    async fn deliver(&self, record: &SubmissionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening outbox {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(id = record.id(), path = %self.path.display(), "submission queued");
        Ok(())
    }
}
