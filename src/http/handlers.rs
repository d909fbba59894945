use super::state::AppState;
use crate::draft::StatementIndex;
use crate::error::WorkflowError;
use crate::submission::SubmissionReceipt;
use crate::workflow::{RecordingResolution, WorkflowSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectLieRequest {
    pub index: StatementIndex,
}

#[derive(Debug, Serialize)]
pub struct CreateChallengeResponse {
    pub id: String,
    pub workflow: WorkflowSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub resolution: RecordingResolution,
    pub workflow: WorkflowSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub receipt: SubmissionReceipt,
    pub workflow: WorkflowSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// "blocking" for prompts that stop the action, "alert" otherwise
    pub prompt: String,
}

impl From<&WorkflowError> for ErrorResponse {
    fn from(error: &WorkflowError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            prompt: if error.is_blocking() { "blocking" } else { "alert" }.to_string(),
        }
    }
}

fn status_for(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
        WorkflowError::IncompleteDraft { .. } | WorkflowError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        WorkflowError::Capture(_) | WorkflowError::Submission(_) => StatusCode::BAD_GATEWAY,
    }
}

fn workflow_error(id: &str, error: WorkflowError) -> Response {
    warn!("Workflow {}: {}", id, error);
    (status_for(&error), Json(ErrorResponse::from(&error))).into_response()
}

fn not_found(id: &str) -> Response {
    error!("Challenge {} not found", id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: "NOT_FOUND".to_string(),
            message: format!("Challenge {} not found", id),
            prompt: "alert".to_string(),
        }),
    )
        .into_response()
}

fn statement_index(id: &str, index: usize) -> Result<StatementIndex, Response> {
    StatementIndex::new(index).map_err(|e| workflow_error(id, e))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /challenges
/// Start a new challenge draft
pub async fn create_challenge(State(state): State<AppState>) -> Response {
    let (id, workflow) = state.create_workflow().await;
    let snapshot = workflow.lock().await.snapshot();

    info!("Challenge {} created", id);

    (
        StatusCode::CREATED,
        Json(CreateChallengeResponse {
            id,
            workflow: snapshot,
        }),
    )
        .into_response()
}

/// GET /challenges/:id
/// Current state, draft and derived totals. `:id` is the workflow id; after
/// a submission `draft.id` names the fresh draft instead.
pub async fn get_challenge(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.workflow(&id).await {
        Some(workflow) => {
            let snapshot = workflow.lock().await.snapshot();
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        None => not_found(&id),
    }
}

/// DELETE /challenges/:id
/// Discard the draft and forget the challenge
pub async fn discard_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let workflow = {
        let mut workflows = state.workflows.write().await;
        workflows.remove(&id)
    };

    match workflow {
        Some(workflow) => match workflow.lock().await.discard() {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(e) => workflow_error(&id, e),
        },
        None => not_found(&id),
    }
}

/// PUT /challenges/:id/statements/:index
/// Set a statement's text
pub async fn set_statement_text(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<SetTextRequest>,
) -> Response {
    let index = match statement_index(&id, index) {
        Ok(index) => index,
        Err(response) => return response,
    };
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.set_statement_text(index, req.text) {
        Ok(()) => (StatusCode::OK, Json(workflow.snapshot())).into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// PUT /challenges/:id/lie
/// Choose which statement is the lie
pub async fn select_lie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectLieRequest>,
) -> Response {
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.select_lie(req.index) {
        Ok(()) => (StatusCode::OK, Json(workflow.snapshot())).into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// POST /challenges/:id/statements/:index/record
/// Record a statement; the workflow lock is released while capturing so the
/// recording can be cancelled
pub async fn record_statement(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Response {
    let index = match statement_index(&id, index) {
        Ok(index) => index,
        Err(response) => return response,
    };
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let (ticket, capture) = {
        let mut workflow = workflow.lock().await;
        match workflow.begin_recording(index) {
            Ok(ticket) => (ticket, workflow.capture_service()),
            Err(e) => return workflow_error(&id, e),
        }
    };

    let outcome = capture.begin_capture(ticket.index).await;

    let mut workflow = workflow.lock().await;
    match workflow.complete_recording(ticket, outcome) {
        Ok(resolution) => (
            StatusCode::OK,
            Json(RecordResponse {
                resolution,
                workflow: workflow.snapshot(),
            }),
        )
            .into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// POST /challenges/:id/recording/cancel
/// Abandon the recording in flight
pub async fn cancel_recording(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.cancel_recording() {
        Ok(()) => (StatusCode::OK, Json(workflow.snapshot())).into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// POST /challenges/:id/preview
/// Move to preview once every statement is recorded and the lie is chosen
pub async fn preview_challenge(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.create_challenge() {
        Ok(()) => (StatusCode::OK, Json(workflow.snapshot())).into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// POST /challenges/:id/edit
/// Leave preview and return to editing
pub async fn back_to_edit(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.back_to_edit() {
        Ok(()) => (StatusCode::OK, Json(workflow.snapshot())).into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// POST /challenges/:id/confirm
/// Submit the previewed challenge. The workflow lock is held until the
/// backend answers, so other requests for this challenge wait for the result.
pub async fn confirm_challenge(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(workflow) = state.workflow(&id).await else {
        return not_found(&id);
    };

    let mut workflow = workflow.lock().await;
    match workflow.confirm().await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(ConfirmResponse {
                receipt,
                workflow: workflow.snapshot(),
            }),
        )
            .into_response(),
        Err(e) => workflow_error(&id, e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
