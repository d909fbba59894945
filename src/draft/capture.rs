use super::statement::StatementIndex;
use serde::{Deserialize, Serialize};

/// Where a capture's media lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Cloud,
}

/// Recorded clip and its metadata for one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub statement_index: StatementIndex,

    /// URI of the recorded media (e.g. `file:///...`)
    pub source_uri: String,

    pub duration_ms: u64,

    pub file_size_bytes: u64,

    /// Whether the media has been uploaded to remote storage
    pub uploaded: bool,

    pub storage_kind: StorageKind,
}
