//! Trait abstraction for submission delivery to enable mocking in tests

use super::record::SubmissionRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Receives finished submissions; the seam where a backend belongs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Short name for logs and status messages
    fn name(&self) -> &str;

    /// Deliver one record. An error leaves the wizard on its final step.
    async fn deliver(&self, record: &SubmissionRecord) -> Result<()>;
}
