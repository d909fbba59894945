use super::capture::Capture;
use super::draft::ChallengeDraft;
use super::statement::{validate_text, StatementIndex};
use crate::error::WorkflowError;

/// Partial update applied to the draft held by a store
#[derive(Debug, Clone)]
pub enum DraftUpdate {
    SetText { index: StatementIndex, text: String },
    SelectLie(StatementIndex),
    PutCapture(Capture),
    /// Replace the draft with a fresh one
    Reset,
}

/// Holder of the in-progress challenge
///
/// Synchronous and single-consumer: the workflow owning the store is the only
/// writer. Updates are validated here so a read never observes a malformed
/// draft.
pub trait ChallengeDraftStore: Send {
    fn read(&self) -> ChallengeDraft;

    fn write(&mut self, update: DraftUpdate) -> Result<(), WorkflowError>;
}

/// Default in-memory store
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    draft: ChallengeDraft,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing draft
    pub fn with_draft(draft: ChallengeDraft) -> Self {
        Self { draft }
    }
}

impl ChallengeDraftStore for InMemoryDraftStore {
    fn read(&self) -> ChallengeDraft {
        self.draft.clone()
    }

    fn write(&mut self, update: DraftUpdate) -> Result<(), WorkflowError> {
        match update {
            DraftUpdate::SetText { index, text } => {
                validate_text(&text)?;
                self.draft.set_text(index, text);
            }
            DraftUpdate::SelectLie(index) => self.draft.select_lie(index),
            DraftUpdate::PutCapture(capture) => self.draft.put_capture(capture),
            DraftUpdate::Reset => self.draft = ChallengeDraft::new(),
        }
        Ok(())
    }
}
