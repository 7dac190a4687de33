#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::errors::WorkflowError;
use crate::gateway::ResumeApi;
use crate::models::analysis::AnalysisReport;

/// Read-only view of the analysis workflow's state.
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub analysis: Option<AnalysisReport>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the AI-feedback slice of session state. Fetch-only; analysis is
/// read-only client state.
pub struct AnalysisWorkflow {
    api: Arc<dyn ResumeApi>,
    state: Mutex<AnalysisState>,
}

impl AnalysisWorkflow {
    pub fn new(api: Arc<dyn ResumeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(AnalysisState::default()),
        }
    }

    pub fn snapshot(&self) -> AnalysisState {
        self.lock().clone()
    }

    pub async fn fetch_analysis(&self) -> Result<AnalysisReport, WorkflowError> {
        self.begin();
        match self.api.fetch_analysis().await {
            Ok(report) => {
                debug!("stored analysis report");
                let mut state = self.lock();
                state.analysis = Some(report.clone());
                state.is_loading = false;
                state.error = None;
                Ok(report)
            }
            Err(err) => {
                warn!("analysis fetch failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Drops the stored report locally. No network call.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.analysis = None;
        state.error = None;
    }

    fn begin(&self) {
        let mut state = self.lock();
        state.is_loading = true;
        state.error = None;
    }

    fn fail(&self, err: &WorkflowError) {
        let mut state = self.lock();
        state.is_loading = false;
        state.error = Some(err.message().to_string());
    }

    fn lock(&self) -> MutexGuard<'_, AnalysisState> {
        self.state.lock().expect("analysis state poisoned")
    }
}
