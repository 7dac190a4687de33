//! Transport gateway — the single point of outbound calls to the resume
//! service.
//!
//! ARCHITECTURAL RULE: no other module may talk to the service directly.
//! Workflows consume the gateway through the `ResumeApi` trait object so
//! tests can inject a scripted implementation.
//!
//! Every failure is normalized to `WorkflowError::Remote` with a single
//! message: the service's structured `detail` string when present, the
//! transport-level message otherwise, a generic fallback as a last resort.
//! One attempt per call — no retries, no caching; the caller decides what
//! to do with a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::WorkflowError;
use crate::models::analysis::AnalysisReport;
use crate::models::chat::MessageRole;
use crate::models::document::{Document, UploadFile};
use crate::models::score::ScoreReport;

const SESSION_HEADER: &str = "x-client-session";
const GENERIC_ERROR: &str = "An error occurred";

/// Reply to `chat-ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub relevant: bool,
    pub conversation_length: u64,
}

/// Payload of `chat-history`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistory {
    pub history: Vec<HistoryEntry>,
    pub conversation_length: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

/// One async method per remote operation. Arguments are already validated
/// by the calling workflow; every method is a single attempt returning the
/// parsed success payload or a normalized remote error.
#[async_trait]
pub trait ResumeApi: Send + Sync {
    async fn upload_document(&self, file: &UploadFile) -> Result<Document, WorkflowError>;
    async fn fetch_current_document(&self) -> Result<Document, WorkflowError>;
    async fn fetch_ats_score(&self) -> Result<ScoreReport, WorkflowError>;
    async fn score_with_job_description(&self, jd_text: &str)
        -> Result<ScoreReport, WorkflowError>;
    async fn fetch_analysis(&self) -> Result<AnalysisReport, WorkflowError>;
    async fn chat_ask(&self, message: &str) -> Result<ChatReply, WorkflowError>;
    async fn chat_history(&self) -> Result<ChatHistory, WorkflowError>;
    async fn chat_clear_history(&self) -> Result<(), WorkflowError>;
    async fn chat_reset(&self) -> Result<(), WorkflowError>;
}

// Wire envelopes. The service wraps some payloads with status/message
// fields the client never reads; only the consumed fields are declared.

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    resume: Document,
}

#[derive(Debug, Deserialize)]
struct ScoresEnvelope {
    scores: ScoreReport,
}

#[derive(Debug, Deserialize)]
struct AnalysisEnvelope {
    analysis: AnalysisReport,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, serde::Serialize)]
struct JdRequest<'a> {
    jd_text: &'a str,
}

#[derive(Debug, serde::Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

/// HTTP implementation of `ResumeApi` over the service's REST boundary.
/// Holds one `reqwest::Client` and a per-session id attached to every
/// request as standard metadata.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    session_id: Uuid,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_id: Uuid::new_v4(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header(SESSION_HEADER, self.session_id.to_string())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(SESSION_HEADER, self.session_id.to_string())
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .header(SESSION_HEADER, self.session_id.to_string())
    }

    /// Sends the request and decodes the success payload, normalizing
    /// transport failures, service error bodies, and schema mismatches
    /// into a single remote error.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, WorkflowError> {
        let response = self.execute_raw(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| WorkflowError::Remote(format!("Invalid response from service: {e}")))
    }

    /// Sends the request and checks the status, ignoring the body. Used by
    /// the ack-only chat operations.
    async fn execute_ack(&self, request: RequestBuilder) -> Result<(), WorkflowError> {
        self.execute_raw(request).await?;
        Ok(())
    }

    async fn execute_raw(
        &self,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, WorkflowError> {
        let response = request
            .send()
            .await
            .map_err(|e| WorkflowError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::Remote(normalize_error(status, &body)));
        }

        debug!(%status, "service call succeeded");
        Ok(response)
    }
}

#[async_trait]
impl ResumeApi for HttpGateway {
    async fn upload_document(&self, file: &UploadFile) -> Result<Document, WorkflowError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| {
                WorkflowError::Validation(format!("Unsupported MIME type '{}'", file.mime_type))
            })?;
        let form = Form::new().part("file", part);

        let envelope: UploadEnvelope = self
            .execute(self.post("/documents/upload-resume").multipart(form))
            .await?;
        Ok(envelope.resume)
    }

    async fn fetch_current_document(&self) -> Result<Document, WorkflowError> {
        self.execute(self.get("/documents/current-resume")).await
    }

    async fn fetch_ats_score(&self) -> Result<ScoreReport, WorkflowError> {
        let envelope: ScoresEnvelope = self.execute(self.get("/scoring/score-resume")).await?;
        Ok(envelope.scores)
    }

    async fn score_with_job_description(
        &self,
        jd_text: &str,
    ) -> Result<ScoreReport, WorkflowError> {
        let envelope: ScoresEnvelope = self
            .execute(self.post("/scoring/score-with-jd").json(&JdRequest { jd_text }))
            .await?;
        Ok(envelope.scores)
    }

    async fn fetch_analysis(&self) -> Result<AnalysisReport, WorkflowError> {
        let envelope: AnalysisEnvelope =
            self.execute(self.get("/analysis/analyze-resume")).await?;
        Ok(envelope.analysis)
    }

    async fn chat_ask(&self, message: &str) -> Result<ChatReply, WorkflowError> {
        self.execute(self.post("/chatbot/ask").json(&AskRequest { message }))
            .await
    }

    async fn chat_history(&self) -> Result<ChatHistory, WorkflowError> {
        self.execute(self.get("/chatbot/history")).await
    }

    async fn chat_clear_history(&self) -> Result<(), WorkflowError> {
        self.execute_ack(self.delete("/chatbot/clear-history")).await
    }

    async fn chat_reset(&self) -> Result<(), WorkflowError> {
        self.execute_ack(self.post("/chatbot/reset")).await
    }
}

/// Normalization rule: structured `detail` string verbatim when present,
/// otherwise the transport-level status message, otherwise a generic
/// fallback.
fn normalize_error(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let detail = parsed.detail.trim();
        if !detail.is_empty() {
            return detail.to_string();
        }
    }
    if status.is_client_error() || status.is_server_error() {
        return format!("Request failed with status code {}", status.as_u16());
    }
    GENERIC_ERROR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_surfaced_verbatim() {
        let body = r#"{"detail": "No resume uploaded yet"}"#;
        assert_eq!(
            normalize_error(StatusCode::NOT_FOUND, body),
            "No resume uploaded yet"
        );
    }

    #[test]
    fn test_malformed_body_falls_back_to_status() {
        assert_eq!(
            normalize_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn test_empty_detail_falls_back_to_status() {
        let body = r#"{"detail": "  "}"#;
        assert_eq!(
            normalize_error(StatusCode::BAD_REQUEST, body),
            "Request failed with status code 400"
        );
    }

    #[test]
    fn test_empty_body_falls_back_to_status() {
        assert_eq!(
            normalize_error(StatusCode::BAD_GATEWAY, ""),
            "Request failed with status code 502"
        );
    }
}
