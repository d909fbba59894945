use super::state::WorkflowState;
use crate::draft::ChallengeDraft;
use serde::Serialize;

/// Serializable view of a workflow, derived values included
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    /// Stable key of the workflow, unlike `draft.id`
    pub workflow_id: String,

    #[serde(flatten)]
    pub state: WorkflowState,

    pub draft: ChallengeDraft,

    /// All three statements recorded
    pub is_draft_complete: bool,

    /// Recorded and the lie is selected
    pub can_submit: bool,

    /// Sum over present captures
    pub aggregate_duration_ms: u64,

    /// Sum over present captures
    pub aggregate_size_bytes: u64,
}
