// Integration tests for the statement recording workflow
//
// These drive the state machine through its transitions with scripted
// capture and submission collaborators.

mod common;

use anyhow::Result;
use challenge_recorder::workflow::assemble_submission;
use challenge_recorder::{
    CaptureOutcome, ChallengeDraft, InMemoryDraftStore, RecordingResolution, StatementIndex,
    StatementRecordingWorkflow, WorkflowError, WorkflowState,
};
use common::{RecordingBackend, ScriptedCapture};
use std::sync::Arc;

const FIRST: StatementIndex = StatementIndex::FIRST;
const SECOND: StatementIndex = StatementIndex::SECOND;
const THIRD: StatementIndex = StatementIndex::THIRD;

fn workflow(
    capture: &Arc<ScriptedCapture>,
    backend: &Arc<RecordingBackend>,
) -> StatementRecordingWorkflow<InMemoryDraftStore> {
    StatementRecordingWorkflow::new(
        InMemoryDraftStore::new(),
        capture.clone(),
        backend.clone(),
    )
}

fn enter_texts(workflow: &mut StatementRecordingWorkflow<InMemoryDraftStore>) -> Result<()> {
    workflow.set_statement_text(FIRST, "I own a cat")?;
    workflow.set_statement_text(SECOND, "I can swim")?;
    workflow.set_statement_text(THIRD, "I hate pizza")?;
    Ok(())
}

#[tokio::test]
async fn test_full_challenge_scenario() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.succeed_with(FIRST, 4000, 400_000);
    capture.succeed_with(SECOND, 3000, 300_000);
    capture.succeed_with(THIRD, 5000, 500_000);
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);

    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        assert_eq!(workflow.record(index).await?, RecordingResolution::Captured);
    }
    workflow.select_lie(THIRD)?;

    assert!(workflow.is_draft_complete());
    assert!(workflow.can_submit());
    assert_eq!(workflow.aggregate_duration_ms(), 12000);
    assert_eq!(workflow.aggregate_size_bytes(), 1_200_000);

    workflow.create_challenge()?;
    assert_eq!(workflow.state(), &WorkflowState::Preview);

    let challenge_id = workflow.challenge_id();
    let receipt = workflow.confirm().await?;
    assert_eq!(receipt.challenge_id, challenge_id);
    assert!(matches!(workflow.state(), WorkflowState::Complete { .. }));

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    let submitted = &submissions[0];
    assert_eq!(submitted.statements, vec!["I own a cat", "I can swim", "I hate pizza"]);
    assert_eq!(submitted.lie_index, THIRD);
    let order: Vec<StatementIndex> = submitted.media_data.iter().map(|c| c.statement_index).collect();
    assert_eq!(order, StatementIndex::ALL.to_vec());

    // Submitted draft is replaced by a fresh one
    let draft = workflow.draft();
    assert_ne!(draft.id, challenge_id);
    assert_eq!(draft.captures().count(), 0);
    assert_eq!(draft.lie_index, None);

    Ok(())
}

#[tokio::test]
async fn test_record_with_empty_text_is_rejected() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    workflow.set_statement_text(FIRST, "   ")?;

    for _ in 0..2 {
        let result = workflow.begin_recording(FIRST);
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
        assert_eq!(workflow.state(), &WorkflowState::Statements);
    }

    let err = workflow.record(SECOND).await.unwrap_err();
    assert!(err.is_blocking());
    assert!(capture.calls().is_empty(), "Capture service must not be called");

    Ok(())
}

#[tokio::test]
async fn test_rerecord_replaces_only_that_capture() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.succeed_with(FIRST, 4000, 1);
    capture.succeed_with(SECOND, 3000, 1);
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;

    workflow.record(FIRST).await?;
    workflow.record(SECOND).await?;
    let second_before = workflow.draft().capture(SECOND).cloned();

    capture.succeed_with(FIRST, 7000, 2);
    workflow.record(FIRST).await?;

    let draft = workflow.draft();
    assert_eq!(draft.capture(FIRST).map(|c| c.duration_ms), Some(7000));
    assert_eq!(draft.capture(SECOND).cloned(), second_before);
    assert!(draft.capture(THIRD).is_none());

    Ok(())
}

#[tokio::test]
async fn test_cancelled_recording_leaves_draft_identical() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.script(SECOND, CaptureOutcome::Cancelled);
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(FIRST).await?;

    let before = workflow.draft();
    let resolution = workflow.record(SECOND).await?;

    assert_eq!(resolution, RecordingResolution::Cancelled);
    assert_eq!(workflow.state(), &WorkflowState::Statements);
    assert_eq!(workflow.draft(), before);
    assert!(workflow.draft().capture(SECOND).is_none());

    Ok(())
}

#[tokio::test]
async fn test_user_cancel_drops_late_capture() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;

    let stale = workflow.begin_recording(SECOND)?;
    assert_eq!(
        workflow.state(),
        &WorkflowState::Recording {
            index: SECOND,
            session: stale.session
        }
    );
    let before = workflow.draft();
    workflow.cancel_recording()?;

    // Same index recorded again before the first attempt reports back
    let current = workflow.begin_recording(SECOND)?;
    let late = CaptureOutcome::Success(common::capture(SECOND, 9999, 1));
    assert_eq!(
        workflow.complete_recording(stale, late)?,
        RecordingResolution::Discarded
    );
    assert_eq!(workflow.draft(), before);

    let fresh = CaptureOutcome::Success(common::capture(SECOND, 3000, 1));
    assert_eq!(
        workflow.complete_recording(current, fresh)?,
        RecordingResolution::Captured
    );
    assert_eq!(workflow.draft().capture(SECOND).map(|c| c.duration_ms), Some(3000));

    Ok(())
}

#[tokio::test]
async fn test_second_recording_cannot_start_while_one_is_active() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;

    workflow.begin_recording(FIRST)?;
    let result = workflow.begin_recording(SECOND);

    assert!(matches!(
        result,
        Err(WorkflowError::InvalidTransition { state: "recording", .. })
    ));
    assert!(matches!(
        workflow.state(),
        WorkflowState::Recording { index, .. } if *index == FIRST
    ));

    Ok(())
}

#[tokio::test]
async fn test_capture_failure_is_surfaced_verbatim() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.script(FIRST, CaptureOutcome::Failed("Camera permission denied".to_string()));
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;

    let err = workflow.record(FIRST).await.unwrap_err();
    assert_eq!(err, WorkflowError::Capture("Camera permission denied".to_string()));
    assert_eq!(workflow.state(), &WorkflowState::Statements);
    assert!(workflow.draft().capture(FIRST).is_none());
    assert_eq!(capture.calls(), vec![FIRST], "No automatic retry");

    // Retry is a fresh user action
    capture.succeed_with(FIRST, 2000, 1);
    assert_eq!(workflow.record(FIRST).await?, RecordingResolution::Captured);

    Ok(())
}

#[tokio::test]
async fn test_capture_for_wrong_statement_is_not_written() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.script(FIRST, CaptureOutcome::Success(common::capture(THIRD, 1000, 1)));
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;

    let err = workflow.record(FIRST).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Capture(_)));
    assert_eq!(workflow.draft().captures().count(), 0);
    assert_eq!(workflow.state(), &WorkflowState::Statements);

    Ok(())
}

#[tokio::test]
async fn test_preview_requires_all_captures() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(FIRST).await?;
    workflow.record(SECOND).await?;
    workflow.select_lie(FIRST)?;

    let err = workflow.create_challenge().unwrap_err();
    assert_eq!(
        err,
        WorkflowError::IncompleteDraft {
            missing: vec![THIRD],
            lie_selected: true,
        }
    );
    assert!(!err.is_blocking());
    assert_eq!(workflow.state(), &WorkflowState::Statements);

    Ok(())
}

#[tokio::test]
async fn test_preview_requires_lie_selection() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        workflow.record(index).await?;
    }

    assert!(workflow.is_draft_complete());
    assert!(!workflow.can_submit());
    assert!(matches!(
        workflow.create_challenge(),
        Err(WorkflowError::IncompleteDraft {
            lie_selected: false,
            ..
        })
    ));

    Ok(())
}

#[tokio::test]
async fn test_back_to_edit_round_trip_preserves_draft() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        workflow.record(index).await?;
    }
    workflow.select_lie(SECOND)?;

    workflow.create_challenge()?;
    let in_preview = workflow.draft();
    workflow.back_to_edit()?;
    assert_eq!(workflow.state(), &WorkflowState::Statements);
    workflow.create_challenge()?;

    assert_eq!(workflow.state(), &WorkflowState::Preview);
    assert_eq!(workflow.draft(), in_preview);

    Ok(())
}

#[tokio::test]
async fn test_rerecording_the_lie_keeps_the_flag() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(SECOND).await?;
    workflow.select_lie(SECOND)?;

    workflow.record(SECOND).await?;

    let draft = workflow.draft();
    assert_eq!(draft.lie_index, Some(SECOND));
    assert!(draft.statement(SECOND).is_lie);
    assert!(draft.lie_is_consistent());

    Ok(())
}

#[tokio::test]
async fn test_text_edit_keeps_existing_capture() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(FIRST).await?;

    workflow.set_statement_text(FIRST, "I own two cats")?;

    let draft = workflow.draft();
    assert_eq!(draft.statement(FIRST).text, "I own two cats");
    assert!(draft.capture(FIRST).is_some());

    Ok(())
}

#[tokio::test]
async fn test_editing_is_blocked_outside_statements() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        workflow.record(index).await?;
    }
    workflow.select_lie(FIRST)?;
    workflow.create_challenge()?;
    let before = workflow.draft();

    assert!(matches!(
        workflow.set_statement_text(FIRST, "changed"),
        Err(WorkflowError::InvalidTransition { state: "preview", .. })
    ));
    assert!(workflow.select_lie(SECOND).is_err());
    assert!(workflow.begin_recording(FIRST).is_err());
    assert!(workflow.cancel_recording().is_err());
    assert_eq!(workflow.draft(), before);

    Ok(())
}

#[tokio::test]
async fn test_failed_submission_stays_in_preview() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    backend.fail_with("Merge service unavailable");
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        workflow.record(index).await?;
    }
    workflow.select_lie(FIRST)?;
    workflow.create_challenge()?;
    let before = workflow.draft();

    let err = workflow.confirm().await.unwrap_err();
    assert_eq!(err, WorkflowError::Submission("Merge service unavailable".to_string()));
    assert_eq!(workflow.state(), &WorkflowState::Preview);
    assert_eq!(workflow.draft(), before);

    backend.recover();
    let receipt = workflow.confirm().await?;
    assert_eq!(receipt.challenge_id, before.id);
    assert_eq!(backend.submissions().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_confirm_outside_preview_is_invalid() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);

    assert!(matches!(
        workflow.confirm().await,
        Err(WorkflowError::InvalidTransition { state: "statements", .. })
    ));
    assert!(workflow.back_to_edit().is_err());
    assert!(backend.submissions().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_discard_starts_a_fresh_draft() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(FIRST).await?;
    let old_id = workflow.challenge_id();
    let ticket = workflow.begin_recording(SECOND)?;

    workflow.discard()?;

    assert_eq!(workflow.state(), &WorkflowState::Statements);
    let draft = workflow.draft();
    assert_ne!(draft.id, old_id);
    assert_eq!(draft.captures().count(), 0);
    assert!(!draft.statement(FIRST).has_text());

    let late = CaptureOutcome::Success(common::capture(SECOND, 1000, 1));
    assert_eq!(
        workflow.complete_recording(ticket, late)?,
        RecordingResolution::Discarded
    );

    Ok(())
}

#[tokio::test]
async fn test_snapshot_reports_partial_totals() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    capture.succeed_with(FIRST, 4000, 10);
    capture.succeed_with(SECOND, 3000, 20);
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    enter_texts(&mut workflow)?;
    workflow.record(FIRST).await?;
    workflow.record(SECOND).await?;

    let snapshot = workflow.snapshot();
    assert!(!snapshot.is_draft_complete);
    assert!(!snapshot.can_submit);
    assert_eq!(snapshot.aggregate_duration_ms, 7000);
    assert_eq!(snapshot.aggregate_size_bytes, 30);

    let json = serde_json::to_value(&snapshot)?;
    assert_eq!(json["state"], "statements");
    assert_eq!(json["aggregate_duration_ms"], 7000);

    Ok(())
}

#[tokio::test]
async fn test_preview_rejects_lie_flag_on_other_statement() -> Result<()> {
    let mut draft = ChallengeDraft::new();
    for (index, text) in StatementIndex::ALL.into_iter().zip(["I own a cat", "I can swim", "I hate pizza"]) {
        draft.set_text(index, text.to_string());
        draft.put_capture(common::capture(index, 1000, 100));
    }
    // Flag and index disagree
    draft.statements[0].is_lie = true;
    draft.lie_index = Some(THIRD);
    assert!(draft.can_submit());
    assert!(!draft.lie_is_consistent());

    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = StatementRecordingWorkflow::new(
        InMemoryDraftStore::with_draft(draft.clone()),
        capture.clone(),
        backend.clone(),
    );
    assert_eq!(workflow.challenge_id(), draft.id);

    let err = workflow.create_challenge().unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert!(err.is_blocking());
    assert_eq!(workflow.state(), &WorkflowState::Statements);
    assert!(assemble_submission(&draft).is_err());

    // Selecting the lie again makes flag and index agree
    workflow.select_lie(THIRD)?;
    workflow.create_challenge()?;
    assert_eq!(workflow.state(), &WorkflowState::Preview);

    Ok(())
}

#[tokio::test]
async fn test_workflow_id_survives_draft_replacement() -> Result<()> {
    let capture = Arc::new(ScriptedCapture::new());
    let backend = Arc::new(RecordingBackend::new());
    let mut workflow = workflow(&capture, &backend);
    let workflow_id = workflow.workflow_id().to_string();
    assert_eq!(workflow.challenge_id(), workflow_id);

    enter_texts(&mut workflow)?;
    for index in StatementIndex::ALL {
        workflow.record(index).await?;
    }
    workflow.select_lie(SECOND)?;
    workflow.create_challenge()?;
    workflow.confirm().await?;

    assert_ne!(workflow.challenge_id(), workflow_id);
    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.workflow_id, workflow_id);
    assert_ne!(snapshot.draft.id, workflow_id);

    workflow.discard()?;
    assert_eq!(workflow.workflow_id(), workflow_id);

    Ok(())
}
