// Shared test doubles for the capture and submission collaborators

#![allow(dead_code)]

use anyhow::Result;
use challenge_recorder::{
    Capture, CaptureOutcome, ChallengeSubmission, MediaCaptureService, StatementIndex,
    StorageKind, SubmissionBackend, SubmissionReceipt,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn capture(index: StatementIndex, duration_ms: u64, file_size_bytes: u64) -> Capture {
    Capture {
        statement_index: index,
        source_uri: format!("file:///recordings/statement-{}.mp4", index.number()),
        duration_ms,
        file_size_bytes,
        uploaded: false,
        storage_kind: StorageKind::Local,
    }
}

/// Capture service that replays scripted outcomes per statement
///
/// Statements without a script succeed with a 1s, 1000 byte capture.
#[derive(Default)]
pub struct ScriptedCapture {
    outcomes: Mutex<HashMap<StatementIndex, CaptureOutcome>>,
    calls: Mutex<Vec<StatementIndex>>,
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, index: StatementIndex, outcome: CaptureOutcome) {
        self.outcomes.lock().unwrap().insert(index, outcome);
    }

    pub fn succeed_with(&self, index: StatementIndex, duration_ms: u64, size: u64) {
        self.script(index, CaptureOutcome::Success(capture(index, duration_ms, size)));
    }

    pub fn calls(&self) -> Vec<StatementIndex> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaCaptureService for ScriptedCapture {
    async fn begin_capture(&self, statement_index: StatementIndex) -> CaptureOutcome {
        self.calls.lock().unwrap().push(statement_index);
        self.outcomes
            .lock()
            .unwrap()
            .get(&statement_index)
            .cloned()
            .unwrap_or_else(|| CaptureOutcome::Success(capture(statement_index, 1000, 1000)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Submission backend that records payloads and can be told to fail
#[derive(Default)]
pub struct RecordingBackend {
    failure: Mutex<Option<String>>,
    submissions: Mutex<Vec<ChallengeSubmission>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn submissions(&self) -> Vec<ChallengeSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SubmissionBackend for RecordingBackend {
    async fn submit(&self, submission: ChallengeSubmission) -> Result<SubmissionReceipt> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            anyhow::bail!(reason);
        }

        let receipt = SubmissionReceipt {
            challenge_id: submission.challenge_id.clone(),
            accepted_at: Utc::now(),
            message: None,
        };
        self.submissions.lock().unwrap().push(submission);
        Ok(receipt)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Wraps a collaborator so every call first waits for `delay`
pub struct Delayed<T> {
    inner: Arc<T>,
    delay: Duration,
}

impl<T> Delayed<T> {
    pub fn new(inner: Arc<T>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait::async_trait]
impl<T: MediaCaptureService> MediaCaptureService for Delayed<T> {
    async fn begin_capture(&self, statement_index: StatementIndex) -> CaptureOutcome {
        tokio::time::sleep(self.delay).await;
        self.inner.begin_capture(statement_index).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[async_trait::async_trait]
impl<T: SubmissionBackend> SubmissionBackend for Delayed<T> {
    async fn submit(&self, submission: ChallengeSubmission) -> Result<SubmissionReceipt> {
        tokio::time::sleep(self.delay).await;
        self.inner.submit(submission).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
