use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of statements in a challenge
pub const STATEMENT_COUNT: usize = 3;

/// Maximum statement length in characters
pub const MAX_STATEMENT_CHARS: usize = 200;

/// Index of a statement within a challenge, always in `0..3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct StatementIndex(u8);

impl StatementIndex {
    pub const FIRST: StatementIndex = StatementIndex(0);
    pub const SECOND: StatementIndex = StatementIndex(1);
    pub const THIRD: StatementIndex = StatementIndex(2);

    pub const ALL: [StatementIndex; STATEMENT_COUNT] = [Self::FIRST, Self::SECOND, Self::THIRD];

    pub fn new(index: usize) -> Result<Self, WorkflowError> {
        if index < STATEMENT_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(WorkflowError::Validation(format!(
                "Statement index {} is out of range (expected 0..{})",
                index, STATEMENT_COUNT
            )))
        }
    }

    /// Zero-based position
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// One-based number as shown to the user
    pub fn number(self) -> usize {
        self.get() + 1
    }
}

impl TryFrom<usize> for StatementIndex {
    type Error = WorkflowError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StatementIndex> for usize {
    fn from(index: StatementIndex) -> Self {
        index.get()
    }
}

impl fmt::Display for StatementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the three user-authored claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDraft {
    pub index: StatementIndex,
    pub text: String,
    pub is_lie: bool,
}

impl StatementDraft {
    pub fn new(index: StatementIndex) -> Self {
        Self {
            index,
            text: String::new(),
            is_lie: false,
        }
    }

    /// Whitespace-only text counts as empty
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Reject statement text longer than [`MAX_STATEMENT_CHARS`]
pub fn validate_text(text: &str) -> Result<(), WorkflowError> {
    let chars = text.chars().count();
    if chars > MAX_STATEMENT_CHARS {
        return Err(WorkflowError::Validation(format!(
            "Statement is {} characters long (maximum {})",
            chars, MAX_STATEMENT_CHARS
        )));
    }
    Ok(())
}
