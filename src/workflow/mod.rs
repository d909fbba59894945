//! Statement recording workflow
//!
//! State machine behind challenge creation:
//! - `Statements`: enter texts, choose the lie, pick a statement to record
//! - `Recording`: one capture in flight, always returns to `Statements`
//! - `Preview`: review all three recordings
//! - `Complete`: submitted and acknowledged

mod snapshot;
mod state;
mod workflow;

pub use snapshot::WorkflowSnapshot;
pub use state::{RecordingResolution, RecordingTicket, WorkflowState};
pub use workflow::{assemble_submission, StatementRecordingWorkflow};
