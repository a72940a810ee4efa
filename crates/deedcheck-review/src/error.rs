use thiserror::Error;

/// A review object or issue that breaks the output schema. Never corrected
/// silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    #[error("invalid risk level: {0}")]
    InvalidRiskLevel(String),

    #[error("missing section: {0}")]
    MissingSection(&'static str),

    #[error("issue {issue} in {section} missing required field: {field}")]
    MissingField {
        section: String,
        issue: String,
        field: &'static str,
    },

    #[error("issue {issue} in {section} has invalid severity: {severity}")]
    InvalidSeverity {
        section: String,
        issue: String,
        severity: String,
    },

    #[error("issue {issue} in {section} missing evidence.{field}")]
    MissingEvidence {
        section: String,
        issue: String,
        field: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("precedent retrieval failed: {0}")]
    Precedents(String),

    #[error("LLM call failed: {0}")]
    Llm(String),

    #[error("malformed review object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("review failed validation: {0}")]
    Validation(#[from] ValidationError),
}
