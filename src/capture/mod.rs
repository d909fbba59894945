pub mod file;
pub mod probe;
pub mod service;

pub use file::FileCaptureService;
pub use probe::probe_duration_ms;
pub use service::{CaptureOutcome, MediaCaptureService};
