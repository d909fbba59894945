use super::probe::probe_duration_ms;
use super::service::{CaptureOutcome, MediaCaptureService};
use crate::draft::{Capture, StatementIndex, StorageKind};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Capture service that imports pre-recorded clips from disk
///
/// Looks for `statement-<n>.<ext>` (n is 1-based) in the clips directory,
/// copies it into the recordings directory under a fresh name and reports its
/// probed duration and size.
pub struct FileCaptureService {
    clips_dir: PathBuf,
    recordings_dir: PathBuf,
}

impl FileCaptureService {
    pub fn new(clips_dir: impl Into<PathBuf>, recordings_dir: impl Into<PathBuf>) -> Result<Self> {
        let recordings_dir = recordings_dir.into();

        std::fs::create_dir_all(&recordings_dir)
            .context("Failed to create recordings directory")?;

        let service = Self {
            clips_dir: clips_dir.into(),
            recordings_dir,
        };

        info!(
            "File capture initialized: {} -> {}",
            service.clips_dir.display(),
            service.recordings_dir.display()
        );

        Ok(service)
    }

    pub fn clips_dir(&self) -> &Path {
        &self.clips_dir
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Locate the source clip for a statement
    async fn find_clip(&self, index: StatementIndex) -> Result<PathBuf> {
        let stem = format!("statement-{}", index.number());

        let mut entries = tokio::fs::read_dir(&self.clips_dir)
            .await
            .with_context(|| format!("Failed to read clips directory {}", self.clips_dir.display()))?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()) {
                candidates.push(path);
            }
        }

        // Several extensions for one statement: pick deterministically
        candidates.sort();
        candidates
            .into_iter()
            .next()
            .with_context(|| format!("No clip named {}.* in {}", stem, self.clips_dir.display()))
    }

    async fn import(&self, index: StatementIndex) -> Result<Capture> {
        let source = self.find_clip(index).await?;

        let probe_path = source.clone();
        let duration_ms = tokio::task::spawn_blocking(move || probe_duration_ms(probe_path))
            .await
            .context("Probe task panicked")??;

        let file_name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}-statement-{}.{}", uuid::Uuid::new_v4(), index.number(), ext),
            None => format!("{}-statement-{}", uuid::Uuid::new_v4(), index.number()),
        };
        let destination = self.recordings_dir.join(file_name);

        let file_size_bytes = tokio::fs::copy(&source, &destination)
            .await
            .context("Failed to copy clip into recordings")?;

        let destination = tokio::fs::canonicalize(&destination).await?;

        Ok(Capture {
            statement_index: index,
            source_uri: format!("file://{}", destination.display()),
            duration_ms,
            file_size_bytes,
            uploaded: false,
            storage_kind: StorageKind::Local,
        })
    }
}

#[async_trait::async_trait]
impl MediaCaptureService for FileCaptureService {
    async fn begin_capture(&self, statement_index: StatementIndex) -> CaptureOutcome {
        info!("Importing clip for statement {}", statement_index.number());

        match self.import(statement_index).await {
            Ok(capture) => {
                info!(
                    "Captured statement {}: {}ms, {} bytes",
                    statement_index.number(),
                    capture.duration_ms,
                    capture.file_size_bytes
                );
                CaptureOutcome::Success(capture)
            }
            Err(e) => {
                error!("Capture failed for statement {}: {:#}", statement_index.number(), e);
                CaptureOutcome::Failed(format!("{:#}", e))
            }
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
