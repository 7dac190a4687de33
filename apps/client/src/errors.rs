use thiserror::Error;

/// Error taxonomy shared by the transport gateway and all four workflows.
///
/// `Validation` is detected locally and never reaches the network.
/// `Remote` collapses every gateway-surfaced failure — transport-level or
/// service-level — into a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote error: {0}")]
    Remote(String),
}

impl WorkflowError {
    /// The bare message, as stored in a workflow's `error` field and shown
    /// to the user. The `Display` impl prefixes the kind for log lines.
    pub fn message(&self) -> &str {
        match self {
            WorkflowError::Validation(msg) | WorkflowError::Remote(msg) => msg,
        }
    }
}
