use crate::draft::StatementIndex;
use crate::submission::SubmissionReceipt;
use serde::{Deserialize, Serialize};

/// Screen the workflow is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    /// Editing texts, choosing the lie, picking a statement to record
    Statements,
    /// One capture in flight
    Recording {
        index: StatementIndex,
        session: u64,
    },
    /// Reviewing all three recordings before submission
    Preview,
    /// Submitted and acknowledged
    Complete { receipt: SubmissionReceipt },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Statements => "statements",
            WorkflowState::Recording { .. } => "recording",
            WorkflowState::Preview => "preview",
            WorkflowState::Complete { .. } => "complete",
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Statements
    }
}

/// Identifies one recording attempt
///
/// The session number changes on every attempt, so an outcome that arrives
/// after the attempt was cancelled cannot be mistaken for a later one at the
/// same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingTicket {
    pub index: StatementIndex,
    pub session: u64,
}

/// How a recording attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingResolution {
    /// Capture written into the draft
    Captured,
    /// User cancelled; draft unchanged
    Cancelled,
    /// Attempt was no longer active; outcome dropped
    Discarded,
}
