use serde::{Deserialize, Serialize};

/// AI-generated qualitative feedback on the uploaded resume.
/// Read-only client state; created by a successful analysis fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub feedback: Feedback,
    #[serde(default)]
    pub section_improvements: Vec<SectionImprovement>,
    pub keyword_suggestions: KeywordSuggestions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub overall_critique: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub score_reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionImprovement {
    pub section: String,
    pub current_quality: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestions {
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggested_additions: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}
