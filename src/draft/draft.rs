use super::capture::Capture;
use super::statement::{StatementDraft, StatementIndex, STATEMENT_COUNT};
use serde::{Deserialize, Serialize};

/// The full in-progress challenge: texts, lie selection and captures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDraft {
    /// Challenge identifier (e.g., "challenge-1b4e28ba-...")
    pub id: String,

    pub statements: [StatementDraft; STATEMENT_COUNT],

    /// Captures keyed by statement index; sparse while editing
    captures: [Option<Capture>; STATEMENT_COUNT],

    pub lie_index: Option<StatementIndex>,
}

impl ChallengeDraft {
    pub fn new() -> Self {
        Self {
            id: format!("challenge-{}", uuid::Uuid::new_v4()),
            statements: StatementIndex::ALL.map(StatementDraft::new),
            captures: [None, None, None],
            lie_index: None,
        }
    }

    pub fn statement(&self, index: StatementIndex) -> &StatementDraft {
        &self.statements[index.get()]
    }

    pub fn capture(&self, index: StatementIndex) -> Option<&Capture> {
        self.captures[index.get()].as_ref()
    }

    /// Present captures in index order
    pub fn captures(&self) -> impl Iterator<Item = &Capture> {
        self.captures.iter().flatten()
    }

    /// Indices that still have no capture
    pub fn missing_captures(&self) -> Vec<StatementIndex> {
        StatementIndex::ALL
            .into_iter()
            .filter(|index| self.captures[index.get()].is_none())
            .collect()
    }

    pub fn set_text(&mut self, index: StatementIndex, text: String) {
        self.statements[index.get()].text = text;
    }

    /// Store a capture under its own statement index, replacing any prior one
    pub fn put_capture(&mut self, capture: Capture) {
        let slot = capture.statement_index.get();
        self.captures[slot] = Some(capture);
    }

    /// Overwrite the lie selection and keep the per-statement flags in step
    pub fn select_lie(&mut self, index: StatementIndex) {
        self.lie_index = Some(index);
        for statement in self.statements.iter_mut() {
            statement.is_lie = statement.index == index;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.captures.iter().all(Option::is_some)
    }

    pub fn can_submit(&self) -> bool {
        self.is_complete() && self.lie_index.is_some()
    }

    /// Exactly one statement flagged, and it is the selected lie
    pub fn lie_is_consistent(&self) -> bool {
        let flagged: Vec<StatementIndex> = self
            .statements
            .iter()
            .filter(|s| s.is_lie)
            .map(|s| s.index)
            .collect();
        match self.lie_index {
            Some(lie) => flagged == [lie],
            None => flagged.is_empty(),
        }
    }

    pub fn aggregate_duration_ms(&self) -> u64 {
        self.captures().map(|c| c.duration_ms).sum()
    }

    pub fn aggregate_size_bytes(&self) -> u64 {
        self.captures().map(|c| c.file_size_bytes).sum()
    }
}

impl Default for ChallengeDraft {
    fn default() -> Self {
        Self::new()
    }
}
