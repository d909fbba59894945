//! Workflow error taxonomy
//!
//! Every error returns control to `Statements` or `Preview` with the draft
//! intact. None of them is fatal to the process.

use crate::draft::StatementIndex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Local input problem that blocks the triggering action
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempted to preview or submit before the draft was ready
    #[error("{}", describe_incomplete(.missing, .lie_selected))]
    IncompleteDraft {
        missing: Vec<StatementIndex>,
        lie_selected: bool,
    },

    /// Reason reported verbatim by the capture collaborator
    #[error("{0}")]
    Capture(String),

    /// Reason reported verbatim by the submission backend
    #[error("{0}")]
    Submission(String),

    #[error("Cannot {action} while in {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl WorkflowError {
    /// Stable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "VALIDATION_ERROR",
            WorkflowError::IncompleteDraft { .. } => "INCOMPLETE_DRAFT",
            WorkflowError::Capture(_) => "CAPTURE_ERROR",
            WorkflowError::Submission(_) => "SUBMISSION_ERROR",
            WorkflowError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }

    /// Validation failures are shown as blocking prompts, everything else as
    /// a dismissable alert.
    pub fn is_blocking(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}

fn describe_incomplete(missing: &[StatementIndex], lie_selected: &bool) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        let numbers: Vec<String> = missing.iter().map(|i| i.number().to_string()).collect();
        parts.push(format!("record statement(s) {}", numbers.join(", ")));
    }
    if !*lie_selected {
        parts.push("select which statement is the lie".to_string());
    }
    format!("Challenge is incomplete: {}", parts.join(" and "))
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
