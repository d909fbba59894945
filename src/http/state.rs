use crate::capture::MediaCaptureService;
use crate::draft::InMemoryDraftStore;
use crate::submission::SubmissionBackend;
use crate::workflow::StatementRecordingWorkflow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Workflow hosted by the HTTP API
pub type ChallengeWorkflow = StatementRecordingWorkflow<InMemoryDraftStore>;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active workflows (workflow id → workflow)
    pub workflows: Arc<RwLock<HashMap<String, Arc<Mutex<ChallengeWorkflow>>>>>,

    /// Capture service handed to every new workflow
    pub capture: Arc<dyn MediaCaptureService>,

    /// Submission backend handed to every new workflow
    pub submission: Arc<dyn SubmissionBackend>,
}

impl AppState {
    pub fn new(
        capture: Arc<dyn MediaCaptureService>,
        submission: Arc<dyn SubmissionBackend>,
    ) -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
            capture,
            submission,
        }
    }

    /// Create a workflow around a fresh draft and register it
    pub async fn create_workflow(&self) -> (String, Arc<Mutex<ChallengeWorkflow>>) {
        let workflow = StatementRecordingWorkflow::new(
            InMemoryDraftStore::new(),
            Arc::clone(&self.capture),
            Arc::clone(&self.submission),
        );
        let id = workflow.workflow_id().to_string();
        let workflow = Arc::new(Mutex::new(workflow));

        let mut workflows = self.workflows.write().await;
        workflows.insert(id.clone(), Arc::clone(&workflow));

        (id, workflow)
    }

    pub async fn workflow(&self, id: &str) -> Option<Arc<Mutex<ChallengeWorkflow>>> {
        let workflows = self.workflows.read().await;
        workflows.get(id).cloned()
    }
}
