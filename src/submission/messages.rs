use crate::draft::{Capture, StatementIndex};
use serde::{Deserialize, Serialize};

/// Assembled challenge handed to the submission backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSubmission {
    pub challenge_id: String,
    /// Statement texts in index order
    pub statements: Vec<String>,
    /// One capture per statement, ordered by index
    pub media_data: Vec<Capture>,
    pub lie_index: StatementIndex,
    pub submitted_at: String, // RFC3339 timestamp
}

/// Reply expected from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionAck {
    pub challenge_id: String,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
