//! Pipeline error kinds.
//!
//! Every failure surfaced to a caller is one of these structured variants,
//! never a raw panic or stack trace. Only `InvalidInput` and
//! `ModelUnavailable` are pipeline-fatal; `StoreUnavailable` degrades the
//! diagnosis stage and `GenerationTimeout` always falls back to templates.

use serde::Serialize;

/// Structured error for the analysis pipeline.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum AnalysisError {
    /// Bad observation shape or values. User-facing, non-retriable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model artifact missing, corrupt, or shape-mismatched.
    /// Process-fatal at startup, request-fatal mid-pipeline.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Case store backend unreachable. The diagnosis stage degrades to
    /// model-only confidence instead of failing the request.
    #[error("Case store unavailable: {0}")]
    StoreUnavailable(String),

    /// Narrative collaborator slow or down. Always recovered via the
    /// deterministic template fallback, never surfaced to the caller.
    #[error("Narrative generation timed out after {0} ms")]
    GenerationTimeout(u64),

    /// Caller disconnected mid-request.
    #[error("Analysis cancelled by caller")]
    Cancelled,
}

impl AnalysisError {
    /// Whether this error terminates the pipeline (transitions to FAILED).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::ModelUnavailable(_) | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_classification() {
        assert!(AnalysisError::InvalidInput("bad".into()).is_fatal());
        assert!(AnalysisError::ModelUnavailable("missing".into()).is_fatal());
        assert!(AnalysisError::Cancelled.is_fatal());
        assert!(!AnalysisError::StoreUnavailable("down".into()).is_fatal());
        assert!(!AnalysisError::GenerationTimeout(2000).is_fatal());
    }

    #[test]
    fn test_serializes_as_structured_object() {
        let err = AnalysisError::InvalidInput("expected 24 readings, got 23".into());
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["kind"], "InvalidInput");
        assert!(json["detail"]
            .as_str()
            .expect("detail string")
            .contains("24"));
    }
}
