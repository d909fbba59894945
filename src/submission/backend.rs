use super::messages::ChallengeSubmission;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Acknowledgement of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub challenge_id: String,
    pub accepted_at: DateTime<Utc>,
    /// Optional note from the backend
    pub message: Option<String>,
}

/// Backend that accepts finished challenges and merges their clips
///
/// Errors are surfaced to the user verbatim; the workflow does not retry.
#[async_trait::async_trait]
pub trait SubmissionBackend: Send + Sync {
    async fn submit(&self, submission: ChallengeSubmission) -> Result<SubmissionReceipt>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Logs submissions and acknowledges them locally
pub struct DryRunSubmissionBackend;

#[async_trait::async_trait]
impl SubmissionBackend for DryRunSubmissionBackend {
    async fn submit(&self, submission: ChallengeSubmission) -> Result<SubmissionReceipt> {
        let payload = serde_json::to_string_pretty(&submission)?;
        info!(
            "Dry run submission for {}:\n{}",
            submission.challenge_id, payload
        );

        Ok(SubmissionReceipt {
            challenge_id: submission.challenge_id,
            accepted_at: Utc::now(),
            message: Some("dry run".to_string()),
        })
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
