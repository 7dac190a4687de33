#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::errors::WorkflowError;
use crate::gateway::ResumeApi;
use crate::models::document::{Document, UploadFile};

/// MIME types accepted for upload. Anything else is rejected locally,
/// before the gateway is involved.
const ALLOWED_MIME_TYPES: [&str; 2] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const INVALID_TYPE_ERROR: &str = "Please upload a PDF or DOCX file";

/// Read-only view of the document workflow's state.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    pub document: Option<Document>,
    pub file_name: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the "current uploaded document" slice of session state. A
/// successful upload is the only trigger the orchestrator uses to start
/// the scoring and analysis workflows.
pub struct DocumentWorkflow {
    api: Arc<dyn ResumeApi>,
    state: Mutex<DocumentState>,
    max_upload_bytes: u64,
}

impl DocumentWorkflow {
    pub fn new(api: Arc<dyn ResumeApi>, max_upload_bytes: u64) -> Self {
        Self {
            api,
            state: Mutex::new(DocumentState::default()),
            max_upload_bytes,
        }
    }

    pub fn snapshot(&self) -> DocumentState {
        self.lock().clone()
    }

    /// Uploads a resume. Disallowed MIME types and oversize files fail
    /// validation without a network call; a remote failure stores the
    /// error and leaves any previously stored document untouched.
    pub async fn upload(&self, file: UploadFile) -> Result<Document, WorkflowError> {
        if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
            return Err(self.reject(INVALID_TYPE_ERROR.to_string()));
        }
        if file.bytes.len() as u64 > self.max_upload_bytes {
            let limit_mb = self.max_upload_bytes / (1024 * 1024);
            return Err(self.reject(format!("File is larger than the {limit_mb}MB upload limit")));
        }

        self.begin();
        match self.api.upload_document(&file).await {
            Ok(document) => {
                debug!(file_name = %file.file_name, "stored uploaded document");
                let mut state = self.lock();
                state.document = Some(document.clone());
                state.file_name = Some(file.file_name);
                state.is_loading = false;
                state.error = None;
                Ok(document)
            }
            Err(err) => {
                warn!("upload failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Idempotent read of the server-held current document. Same
    /// success/failure shape as `upload`, without the local validation.
    pub async fn fetch_current(&self) -> Result<Document, WorkflowError> {
        self.begin();
        match self.api.fetch_current_document().await {
            Ok(document) => {
                let mut state = self.lock();
                state.document = Some(document.clone());
                state.is_loading = false;
                state.error = None;
                Ok(document)
            }
            Err(err) => {
                warn!("current-document fetch failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Drops the current document locally. No network call.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.document = None;
        state.file_name = None;
        state.error = None;
    }

    fn reject(&self, message: String) -> WorkflowError {
        self.lock().error = Some(message.clone());
        WorkflowError::Validation(message)
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

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().expect("document state poisoned")
    }
}
