use super::snapshot::WorkflowSnapshot;
use super::state::{RecordingResolution, RecordingTicket, WorkflowState};
use crate::capture::{CaptureOutcome, MediaCaptureService};
use crate::draft::{ChallengeDraft, ChallengeDraftStore, DraftUpdate, StatementIndex};
use crate::error::{WorkflowError, WorkflowResult};
use crate::submission::{ChallengeSubmission, SubmissionBackend, SubmissionReceipt};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Walks a user through entering three statements, recording each, marking
/// the lie, previewing and submitting.
pub struct StatementRecordingWorkflow<S: ChallengeDraftStore> {
    /// Id of the first draft; stays put when the draft is replaced
    workflow_id: String,

    /// Injected holder of the draft; only this workflow writes to it
    store: S,

    capture: Arc<dyn MediaCaptureService>,

    submission: Arc<dyn SubmissionBackend>,

    state: WorkflowState,

    /// Session number handed to the next recording attempt
    next_session: u64,
}

impl<S: ChallengeDraftStore> StatementRecordingWorkflow<S> {
    pub fn new(
        store: S,
        capture: Arc<dyn MediaCaptureService>,
        submission: Arc<dyn SubmissionBackend>,
    ) -> Self {
        let workflow_id = store.read().id;

        info!(
            "Creating statement workflow for {} (capture: {}, submission: {})",
            workflow_id,
            capture.name(),
            submission.name()
        );

        Self {
            workflow_id,
            store,
            capture,
            submission,
            state: WorkflowState::Statements,
            next_session: 0,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn draft(&self) -> ChallengeDraft {
        self.store.read()
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Id of the current draft; changes after submission or discard
    pub fn challenge_id(&self) -> String {
        self.store.read().id
    }

    pub fn capture_service(&self) -> Arc<dyn MediaCaptureService> {
        Arc::clone(&self.capture)
    }

    pub fn is_draft_complete(&self) -> bool {
        self.store.read().is_complete()
    }

    pub fn can_submit(&self) -> bool {
        self.store.read().can_submit()
    }

    pub fn aggregate_duration_ms(&self) -> u64 {
        self.store.read().aggregate_duration_ms()
    }

    pub fn aggregate_size_bytes(&self) -> u64 {
        self.store.read().aggregate_size_bytes()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let draft = self.store.read();
        WorkflowSnapshot {
            workflow_id: self.workflow_id.clone(),
            state: self.state.clone(),
            is_draft_complete: draft.is_complete(),
            can_submit: draft.can_submit(),
            aggregate_duration_ms: draft.aggregate_duration_ms(),
            aggregate_size_bytes: draft.aggregate_size_bytes(),
            draft,
        }
    }

    /// Edit a statement. An existing capture for it is kept.
    pub fn set_statement_text(
        &mut self,
        index: StatementIndex,
        text: impl Into<String>,
    ) -> WorkflowResult<()> {
        self.require_statements("edit a statement")?;

        let text = text.into();
        self.store.write(DraftUpdate::SetText { index, text })?;

        info!("Statement {} updated", index.number());
        Ok(())
    }

    /// Mark a statement as the lie, replacing any earlier choice
    pub fn select_lie(&mut self, index: StatementIndex) -> WorkflowResult<()> {
        self.require_statements("select the lie")?;

        self.store.write(DraftUpdate::SelectLie(index))?;

        info!("Statement {} marked as the lie", index.number());
        Ok(())
    }

    /// `Statements → Recording`
    pub fn begin_recording(&mut self, index: StatementIndex) -> WorkflowResult<RecordingTicket> {
        self.require_statements("start recording")?;

        let draft = self.store.read();
        if !draft.statement(index).has_text() {
            return Err(WorkflowError::Validation(format!(
                "Enter statement {} before recording it",
                index.number()
            )));
        }

        let ticket = RecordingTicket {
            index,
            session: self.next_session,
        };
        self.next_session += 1;
        self.state = WorkflowState::Recording {
            index,
            session: ticket.session,
        };

        info!(
            "Recording statement {} (session {})",
            index.number(),
            ticket.session
        );

        Ok(ticket)
    }

    /// `Recording → Statements`, applying the capture outcome
    ///
    /// Outcomes for an attempt that is no longer active are dropped without
    /// touching the draft.
    pub fn complete_recording(
        &mut self,
        ticket: RecordingTicket,
        outcome: CaptureOutcome,
    ) -> WorkflowResult<RecordingResolution> {
        let active = matches!(
            self.state,
            WorkflowState::Recording { index, session }
                if index == ticket.index && session == ticket.session
        );
        if !active {
            warn!(
                "Dropping capture outcome for statement {} (session {} is no longer active)",
                ticket.index.number(),
                ticket.session
            );
            return Ok(RecordingResolution::Discarded);
        }

        self.state = WorkflowState::Statements;

        match outcome {
            CaptureOutcome::Success(capture) => {
                if capture.statement_index != ticket.index {
                    error!(
                        "Capture for statement {} returned while recording statement {}",
                        capture.statement_index.number(),
                        ticket.index.number()
                    );
                    return Err(WorkflowError::Capture(format!(
                        "Recording was saved for statement {} instead of statement {}",
                        capture.statement_index.number(),
                        ticket.index.number()
                    )));
                }

                let duration_ms = capture.duration_ms;
                self.store.write(DraftUpdate::PutCapture(capture))?;

                info!(
                    "Statement {} recorded ({}ms)",
                    ticket.index.number(),
                    duration_ms
                );
                Ok(RecordingResolution::Captured)
            }
            CaptureOutcome::Cancelled => {
                info!("Recording of statement {} cancelled", ticket.index.number());
                Ok(RecordingResolution::Cancelled)
            }
            CaptureOutcome::Failed(reason) => {
                warn!(
                    "Recording of statement {} failed: {}",
                    ticket.index.number(),
                    reason
                );
                Err(WorkflowError::Capture(reason))
            }
        }
    }

    /// `Recording → Statements` on user cancel; the draft is left as is
    pub fn cancel_recording(&mut self) -> WorkflowResult<()> {
        match self.state {
            WorkflowState::Recording { index, session } => {
                info!(
                    "Cancelling recording of statement {} (session {})",
                    index.number(),
                    session
                );
                self.state = WorkflowState::Statements;
                Ok(())
            }
            _ => Err(self.invalid("cancel recording")),
        }
    }

    /// Record one statement through the capture service
    pub async fn record(&mut self, index: StatementIndex) -> WorkflowResult<RecordingResolution> {
        let ticket = self.begin_recording(index)?;
        let outcome = self.capture.begin_capture(index).await;
        self.complete_recording(ticket, outcome)
    }

    /// `Statements → Preview`
    pub fn create_challenge(&mut self) -> WorkflowResult<()> {
        self.require_statements("preview the challenge")?;

        let draft = self.store.read();
        ensure_submittable(&draft)?;

        self.state = WorkflowState::Preview;

        info!(
            "Previewing {} ({}ms total)",
            draft.id,
            draft.aggregate_duration_ms()
        );
        Ok(())
    }

    /// `Preview → Statements`
    pub fn back_to_edit(&mut self) -> WorkflowResult<()> {
        if self.state != WorkflowState::Preview {
            return Err(self.invalid("go back to editing"));
        }

        self.state = WorkflowState::Statements;
        Ok(())
    }

    /// `Preview → Complete`
    ///
    /// On a backend error the workflow stays in `Preview` with the draft
    /// intact so the user can retry.
    pub async fn confirm(&mut self) -> WorkflowResult<SubmissionReceipt> {
        if self.state != WorkflowState::Preview {
            return Err(self.invalid("submit the challenge"));
        }

        let draft = self.store.read();
        let submission = assemble_submission(&draft)?;

        info!(
            "Submitting {} via {}",
            submission.challenge_id,
            self.submission.name()
        );

        match self.submission.submit(submission).await {
            Ok(receipt) => {
                self.store.write(DraftUpdate::Reset)?;
                self.state = WorkflowState::Complete {
                    receipt: receipt.clone(),
                };

                info!("Challenge {} submitted", receipt.challenge_id);
                Ok(receipt)
            }
            Err(e) => {
                error!("Failed to submit {}: {:#}", draft.id, e);
                Err(WorkflowError::Submission(format!("{:#}", e)))
            }
        }
    }

    /// Throw the draft away and start over from any state
    pub fn discard(&mut self) -> WorkflowResult<()> {
        let previous = self.store.read().id;

        self.store.write(DraftUpdate::Reset)?;
        self.state = WorkflowState::Statements;

        info!("Discarded draft {}", previous);
        Ok(())
    }

    fn require_statements(&self, action: &'static str) -> WorkflowResult<()> {
        if self.state == WorkflowState::Statements {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}

/// All captures present, lie selected and flagged on exactly that statement
fn ensure_submittable(draft: &ChallengeDraft) -> WorkflowResult<()> {
    if !draft.can_submit() {
        return Err(WorkflowError::IncompleteDraft {
            missing: draft.missing_captures(),
            lie_selected: draft.lie_index.is_some(),
        });
    }

    if !draft.lie_is_consistent() {
        return Err(WorkflowError::Validation(
            "Exactly one statement must be marked as the lie".to_string(),
        ));
    }

    Ok(())
}

/// Build the backend payload with captures ordered by statement index
pub fn assemble_submission(draft: &ChallengeDraft) -> WorkflowResult<ChallengeSubmission> {
    ensure_submittable(draft)?;

    let lie_index = draft.lie_index.ok_or_else(|| WorkflowError::IncompleteDraft {
        missing: Vec::new(),
        lie_selected: false,
    })?;

    Ok(ChallengeSubmission {
        challenge_id: draft.id.clone(),
        statements: draft.statements.iter().map(|s| s.text.clone()).collect(),
        media_data: draft.captures().cloned().collect(),
        lie_index,
        submitted_at: Utc::now().to_rfc3339(),
    })
}
