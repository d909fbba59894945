pub mod backend;
pub mod messages;
pub mod nats;

pub use backend::{DryRunSubmissionBackend, SubmissionBackend, SubmissionReceipt};
pub use messages::{ChallengeSubmission, SubmissionAck};
pub use nats::NatsSubmissionBackend;
