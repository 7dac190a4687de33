use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::errors::WorkflowError;
use crate::models::document::{Document, UploadFile};
use crate::workflows::analysis::AnalysisWorkflow;
use crate::workflows::conversation::ConversationWorkflow;
use crate::workflows::document::DocumentWorkflow;
use crate::workflows::scoring::ScoringWorkflow;

/// Which top-level view the client is showing. Presentation state only —
/// the orchestrator holds nothing else of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Upload,
    Analysis,
}

/// The only component aware of cross-workflow sequencing. It reads the
/// document workflow's success signal and calls into the other workflows'
/// public operations; it never writes their state directly.
pub struct PageOrchestrator {
    documents: Arc<DocumentWorkflow>,
    scoring: Arc<ScoringWorkflow>,
    analysis: Arc<AnalysisWorkflow>,
    conversation: Arc<ConversationWorkflow>,
    view: Mutex<ActiveView>,
}

impl PageOrchestrator {
    pub fn new(
        documents: Arc<DocumentWorkflow>,
        scoring: Arc<ScoringWorkflow>,
        analysis: Arc<AnalysisWorkflow>,
        conversation: Arc<ConversationWorkflow>,
    ) -> Self {
        Self {
            documents,
            scoring,
            analysis,
            conversation,
            view: Mutex::new(ActiveView::Upload),
        }
    }

    pub fn active_view(&self) -> ActiveView {
        *self.view.lock().expect("view state poisoned")
    }

    /// Uploads a document and, exactly once per successful upload, fires
    /// the score and analysis fetches. The view transition is gated only
    /// on the upload itself resolving, not on the follow-up fetches.
    pub async fn upload(&self, file: UploadFile) -> Result<Document, WorkflowError> {
        let document = self.documents.upload(file).await?;
        info!("document uploaded, switching to the analysis view");
        *self.view.lock().expect("view state poisoned") = ActiveView::Analysis;
        self.refresh().await;
        Ok(document)
    }

    /// Issues the score and analysis fetches concurrently. The two calls
    /// are independent: a failure in one is logged and does not cancel or
    /// affect the other. No automatic retries.
    pub async fn refresh(&self) {
        let (scores, analysis) = tokio::join!(
            self.scoring.fetch_score(),
            self.analysis.fetch_analysis()
        );
        if let Err(err) = scores {
            warn!("score fetch failed after upload: {err}");
        }
        if let Err(err) = analysis {
            warn!("analysis fetch failed after upload: {err}");
        }
    }

    /// The conversation is mounted only once a document exists.
    pub fn conversation(&self) -> Option<Arc<ConversationWorkflow>> {
        if self.documents.snapshot().document.is_some() {
            Some(self.conversation.clone())
        } else {
            None
        }
    }
}
