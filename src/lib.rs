pub mod capture;
pub mod config;
pub mod draft;
pub mod error;
pub mod http;
pub mod submission;
pub mod workflow;

pub use capture::{CaptureOutcome, FileCaptureService, MediaCaptureService};
pub use config::Config;
pub use draft::{
    Capture, ChallengeDraft, ChallengeDraftStore, DraftUpdate, InMemoryDraftStore, StatementDraft,
    StatementIndex, StorageKind,
};
pub use error::{WorkflowError, WorkflowResult};
pub use http::{create_router, AppState};
pub use submission::{
    ChallengeSubmission, DryRunSubmissionBackend, NatsSubmissionBackend, SubmissionBackend,
    SubmissionReceipt,
};
pub use workflow::{
    RecordingResolution, RecordingTicket, StatementRecordingWorkflow, WorkflowSnapshot,
    WorkflowState,
};
