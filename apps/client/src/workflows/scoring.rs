#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::errors::WorkflowError;
use crate::gateway::ResumeApi;
use crate::models::score::{JdMatch, ScoreReport};

/// Read-only view of the scoring workflow's state.
#[derive(Debug, Clone, Default)]
pub struct ScoringState {
    pub scores: Option<ScoreReport>,
    /// Populated only by a job-description-scoped fetch.
    pub jd_match: Option<JdMatch>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the ATS score slice of session state. The workflow itself has no
/// document dependency check; with no document uploaded the server's own
/// error is surfaced.
pub struct ScoringWorkflow {
    api: Arc<dyn ResumeApi>,
    state: Mutex<ScoringState>,
}

impl ScoringWorkflow {
    pub fn new(api: Arc<dyn ResumeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ScoringState::default()),
        }
    }

    pub fn snapshot(&self) -> ScoringState {
        self.lock().clone()
    }

    pub async fn fetch_score(&self) -> Result<ScoreReport, WorkflowError> {
        self.begin();
        match self.api.fetch_ats_score().await {
            Ok(report) => {
                debug!(ats_score = report.ats_score, "stored ATS score report");
                let mut state = self.lock();
                state.scores = Some(report.clone());
                state.is_loading = false;
                state.error = None;
                Ok(report)
            }
            Err(err) => {
                warn!("score fetch failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Scores against a free-text job description. The JD-scoped report is
    /// authoritative once requested: it overwrites the whole report,
    /// section breakdown included.
    pub async fn score_against_job_description(
        &self,
        jd_text: &str,
    ) -> Result<ScoreReport, WorkflowError> {
        self.begin();
        match self.api.score_with_job_description(jd_text).await {
            Ok(report) => {
                debug!(ats_score = report.ats_score, "stored JD-scoped score report");
                let mut state = self.lock();
                state.jd_match = report.jd_match.clone();
                state.scores = Some(report.clone());
                state.is_loading = false;
                state.error = None;
                Ok(report)
            }
            Err(err) => {
                warn!("JD score fetch failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Drops the stored report locally. No network call.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.scores = None;
        state.jd_match = None;
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

    fn lock(&self) -> MutexGuard<'_, ScoringState> {
        self.state.lock().expect("scoring state poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::score::JdMatch;
    use crate::workflows::support::{self, MockApi};

    #[tokio::test]
    async fn test_fetch_score_stores_report() {
        let mock = Arc::new(MockApi::default());
        mock.score
            .lock()
            .unwrap()
            .push_back(Ok(support::score_report(72.0)));
        let scoring = ScoringWorkflow::new(mock.clone());

        scoring.fetch_score().await.unwrap();

        let state = scoring.snapshot();
        assert_eq!(state.scores.unwrap().ats_score, 72.0);
        assert!(state.jd_match.is_none());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_score_surfaces_server_error() {
        let mock = Arc::new(MockApi::default());
        mock.score
            .lock()
            .unwrap()
            .push_back(Err(support::remote("No resume uploaded yet")));
        let scoring = ScoringWorkflow::new(mock.clone());

        let err = scoring.fetch_score().await.unwrap_err();

        assert_eq!(err.message(), "No resume uploaded yet");
        let state = scoring.snapshot();
        assert!(state.scores.is_none());
        assert_eq!(state.error.as_deref(), Some("No resume uploaded yet"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_jd_score_overwrites_report_and_exposes_match() {
        let mock = Arc::new(MockApi::default());
        mock.score
            .lock()
            .unwrap()
            .push_back(Ok(support::score_report(72.0)));
        let mut jd_report = support::score_report(58.0);
        jd_report.jd_match = Some(JdMatch {
            match_percentage: 55.0,
            matching_keywords: 11,
            total_jd_keywords: 20,
            missing_keywords: vec!["docker".to_string()],
        });
        mock.jd_score.lock().unwrap().push_back(Ok(jd_report));
        let scoring = ScoringWorkflow::new(mock.clone());

        scoring.fetch_score().await.unwrap();
        scoring
            .score_against_job_description("Looking for a platform engineer")
            .await
            .unwrap();

        let state = scoring.snapshot();
        assert_eq!(state.scores.as_ref().unwrap().ats_score, 58.0);
        assert_eq!(state.jd_match.unwrap().match_percentage, 55.0);
    }

    #[tokio::test]
    async fn test_clear_drops_report_locally() {
        let mock = Arc::new(MockApi::default());
        mock.score
            .lock()
            .unwrap()
            .push_back(Ok(support::score_report(72.0)));
        let scoring = ScoringWorkflow::new(mock.clone());

        scoring.fetch_score().await.unwrap();
        scoring.clear();

        let state = scoring.snapshot();
        assert!(state.scores.is_none());
        assert!(state.jd_match.is_none());
        assert_eq!(mock.calls(), vec!["score-resume"]);
    }
}
