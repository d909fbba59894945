use crate::draft::{Capture, StatementIndex};

/// Result of one capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Success(Capture),
    /// The user backed out; nothing was recorded
    Cancelled,
    /// Reason is shown to the user verbatim
    Failed(String),
}

/// Media capture collaborator
///
/// Implementations own device access and classify their own failures
/// (permission denied, hardware unavailable, storage full). The workflow
/// never retries on their behalf.
#[async_trait::async_trait]
pub trait MediaCaptureService: Send + Sync {
    /// Record (or import) the clip for one statement
    async fn begin_capture(&self, statement_index: StatementIndex) -> CaptureOutcome;

    /// Get service name for logging
    fn name(&self) -> &str;
}
