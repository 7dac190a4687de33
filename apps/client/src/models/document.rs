use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parsed resume the service holds for the current session.
///
/// Only the name and the extracted skill list are interpreted client-side.
/// Everything else the parser produced (`email`, `summary`, `experience`,
/// `raw_text`, ...) is carried opaquely so rendering layers can pass it
/// through without this crate knowing the fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: Option<String>,
    #[serde(rename = "skills", default)]
    pub extracted_skills: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A file selected for upload, with the metadata the multipart request and
/// the local validation step need.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}
