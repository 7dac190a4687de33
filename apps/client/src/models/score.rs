#![allow(dead_code)]

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Complete ATS score breakdown returned by the scoring service.
///
/// A job-description-scoped fetch returns the same shape with `jd_match`
/// populated; it overwrites the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Overall ATS compatibility score, 0–100.
    pub ats_score: f64,
    pub section_scores: SectionScores,
    #[serde(default)]
    pub keyword_score: f64,
    #[serde(default)]
    pub formatting_score: f64,
    /// Present only after scoring against a job description. The service
    /// sends an empty object when no JD was supplied.
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub jd_match: Option<JdMatch>,
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
}

/// Section-name → score mapping whose insertion order is display order.
/// Decoded through a map visitor; a plain JSON map in this stack would
/// lose the ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionScores(Vec<(String, f64)>);

impl SectionScores {
    pub fn get(&self, section: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, f64)>> for SectionScores {
    fn from(entries: Vec<(String, f64)>) -> Self {
        SectionScores(entries)
    }
}

impl Serialize for SectionScores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (section, score) in &self.0 {
            map.serialize_entry(section, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionScores {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionScoresVisitor;

        impl<'de> Visitor<'de> for SectionScoresVisitor {
            type Value = SectionScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of section names to scores")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((section, score)) = access.next_entry::<String, f64>()? {
                    entries.push((section, score));
                }
                Ok(SectionScores(entries))
            }
        }

        deserializer.deserialize_map(SectionScoresVisitor)
    }
}

/// A section the scorer flagged as dragging the total down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub section: String,
    pub score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Keyword overlap between the resume and a supplied job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdMatch {
    pub match_percentage: f64,
    pub matching_keywords: u32,
    pub total_jd_keywords: u32,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

fn empty_object_as_none<'de, D>(deserializer: D) -> Result<Option<JdMatch>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_scores_preserve_insertion_order() {
        let json = r#"{"summary": 80, "skills": 65, "experience": 90, "education": 70, "contact": 100}"#;
        let scores: SectionScores = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = scores.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["summary", "skills", "experience", "education", "contact"]
        );
        assert_eq!(scores.get("skills"), Some(65.0));
    }

    #[test]
    fn test_section_scores_round_trip() {
        let json = r#"{"zeta":1.0,"alpha":2.0}"#;
        let scores: SectionScores = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&scores).unwrap(), json);
    }

    #[test]
    fn test_empty_jd_match_decodes_as_none() {
        let json = r#"{
            "ats_score": 72,
            "section_scores": {"summary": 80},
            "keyword_score": 60,
            "formatting_score": 90,
            "jd_match": {},
            "weaknesses": []
        }"#;
        let report: ScoreReport = serde_json::from_str(json).unwrap();
        assert!(report.jd_match.is_none());
    }

    #[test]
    fn test_populated_jd_match_decodes() {
        let json = r#"{
            "ats_score": 72,
            "section_scores": {"summary": 80},
            "jd_match": {
                "match_percentage": 55,
                "matching_keywords": 11,
                "total_jd_keywords": 20,
                "missing_keywords": ["docker", "kubernetes"]
            },
            "weaknesses": [{"section": "skills", "score": 40, "severity": "high"}]
        }"#;
        let report: ScoreReport = serde_json::from_str(json).unwrap();
        let jd = report.jd_match.unwrap();
        assert_eq!(jd.match_percentage, 55.0);
        assert_eq!(jd.missing_keywords.len(), 2);
        assert_eq!(report.weaknesses[0].severity, Severity::High);
    }
}
