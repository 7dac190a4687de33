//! Scripted `ResumeApi` implementation shared by the workflow and
//! orchestrator tests: queue per-operation results up front, run the
//! workflow, then assert on the recorded call log.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::WorkflowError;
use crate::gateway::{ChatHistory, ChatReply, ResumeApi};
use crate::models::analysis::{AnalysisReport, Feedback, KeywordSuggestions};
use crate::models::document::{Document, UploadFile};
use crate::models::score::ScoreReport;

#[derive(Default)]
pub struct MockApi {
    pub upload: Mutex<VecDeque<Result<Document, WorkflowError>>>,
    pub current: Mutex<VecDeque<Result<Document, WorkflowError>>>,
    pub score: Mutex<VecDeque<Result<ScoreReport, WorkflowError>>>,
    pub jd_score: Mutex<VecDeque<Result<ScoreReport, WorkflowError>>>,
    pub analysis: Mutex<VecDeque<Result<AnalysisReport, WorkflowError>>>,
    pub ask: Mutex<VecDeque<Result<ChatReply, WorkflowError>>>,
    pub history: Mutex<VecDeque<Result<ChatHistory, WorkflowError>>>,
    pub clear: Mutex<VecDeque<Result<(), WorkflowError>>>,
    pub reset: Mutex<VecDeque<Result<(), WorkflowError>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockApi {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    fn record(&self, operation: &'static str) {
        self.calls.lock().unwrap().push(operation);
    }

    fn take<T>(
        queue: &Mutex<VecDeque<Result<T, WorkflowError>>>,
        operation: &'static str,
    ) -> Result<T, WorkflowError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for {operation}"))
    }
}

#[async_trait]
impl ResumeApi for MockApi {
    async fn upload_document(&self, _file: &UploadFile) -> Result<Document, WorkflowError> {
        self.record("upload-document");
        Self::take(&self.upload, "upload-document")
    }

    async fn fetch_current_document(&self) -> Result<Document, WorkflowError> {
        self.record("current-document");
        Self::take(&self.current, "current-document")
    }

    async fn fetch_ats_score(&self) -> Result<ScoreReport, WorkflowError> {
        self.record("score-resume");
        Self::take(&self.score, "score-resume")
    }

    async fn score_with_job_description(
        &self,
        _jd_text: &str,
    ) -> Result<ScoreReport, WorkflowError> {
        self.record("score-with-jd");
        Self::take(&self.jd_score, "score-with-jd")
    }

    async fn fetch_analysis(&self) -> Result<AnalysisReport, WorkflowError> {
        self.record("analyze-resume");
        Self::take(&self.analysis, "analyze-resume")
    }

    async fn chat_ask(&self, _message: &str) -> Result<ChatReply, WorkflowError> {
        self.record("chat-ask");
        Self::take(&self.ask, "chat-ask")
    }

    async fn chat_history(&self) -> Result<ChatHistory, WorkflowError> {
        self.record("chat-history");
        Self::take(&self.history, "chat-history")
    }

    async fn chat_clear_history(&self) -> Result<(), WorkflowError> {
        self.record("chat-clear-history");
        Self::take(&self.clear, "chat-clear-history")
    }

    async fn chat_reset(&self) -> Result<(), WorkflowError> {
        self.record("chat-reset");
        Self::take(&self.reset, "chat-reset")
    }
}

// Fixture builders.

pub fn upload_file(name: &str, mime_type: &str, len: usize) -> UploadFile {
    UploadFile {
        file_name: name.to_string(),
        mime_type: mime_type.to_string(),
        bytes: Bytes::from(vec![0u8; len]),
    }
}

pub fn document(name: &str, skills: &[&str]) -> Document {
    Document {
        name: Some(name.to_string()),
        extracted_skills: skills.iter().map(|s| s.to_string()).collect(),
        extra: serde_json::Map::new(),
    }
}

pub fn score_report(ats_score: f64) -> ScoreReport {
    ScoreReport {
        ats_score,
        section_scores: vec![
            ("summary".to_string(), 80.0),
            ("skills".to_string(), 65.0),
        ]
        .into(),
        keyword_score: 60.0,
        formatting_score: 90.0,
        jd_match: None,
        weaknesses: Vec::new(),
    }
}

pub fn analysis_report(critique: &str) -> AnalysisReport {
    AnalysisReport {
        feedback: Feedback {
            overall_critique: critique.to_string(),
            strengths: vec!["Clear structure".to_string()],
            score_reasoning: "Strong skills section".to_string(),
        },
        section_improvements: Vec::new(),
        keyword_suggestions: KeywordSuggestions {
            missing_keywords: Vec::new(),
            suggested_additions: vec!["docker".to_string()],
            reasoning: "Common in JDs for this role".to_string(),
        },
    }
}

pub fn reply(message: &str, relevant: bool, conversation_length: u64) -> ChatReply {
    ChatReply {
        message: message.to_string(),
        relevant,
        conversation_length,
    }
}

pub fn remote(message: &str) -> WorkflowError {
    WorkflowError::Remote(message.to_string())
}
