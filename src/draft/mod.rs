//! Challenge draft data model
//!
//! - `StatementIndex`: bounded index of a statement
//! - `StatementDraft`: one user-authored claim
//! - `Capture`: recorded clip metadata for a statement
//! - `ChallengeDraft`: texts, lie selection and sparse captures
//! - `ChallengeDraftStore`: injected holder of the draft

mod capture;
mod draft;
mod statement;
mod store;

pub use capture::{Capture, StorageKind};
pub use draft::ChallengeDraft;
pub use statement::{
    validate_text, StatementDraft, StatementIndex, MAX_STATEMENT_CHARS, STATEMENT_COUNT,
};
pub use store::{ChallengeDraftStore, DraftUpdate, InMemoryDraftStore};
