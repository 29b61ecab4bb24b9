//! Error taxonomy for the ingestion pipeline
//!
//! Kinds map to how the pipeline reacts:
//! - `Validation` is surfaced synchronously at the upload boundary, nothing
//!   is persisted.
//! - `Extraction` is a terminal failure for the resume.
//! - `Persistence` is retried up to the configured attempt budget.
//! - `Timeout` is terminal with reason "timeout".
//!
//! Sub-extractor faults never surface here at all: each field extractor
//! degrades to `None`/empty on its own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Bad input at the upload boundary (size, extension, empty file).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Text extraction yielded too little usable text to parse.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Storage layer failure (filesystem or SQLite). Retryable.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// DuplicateDetector internal failure. Treated as "no match".
    #[error("duplicate decision failure: {0}")]
    DuplicateDecision(String),

    /// Wall-clock budget for one resume exceeded.
    #[error("timeout")]
    Timeout,

    /// Resume id does not exist. Permanently fatal, no retry.
    #[error("resume not found: {0}")]
    NotFound(String),
}

impl IngestError {
    /// Whether the job runner should retry the failing step.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::Persistence(_))
    }
}

impl From<rusqlite::Error> for IngestError {
    fn from(e: rusqlite::Error) -> Self {
        IngestError::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_persistence_is_retryable() {
        assert!(IngestError::Persistence("disk full".into()).is_retryable());
        assert!(!IngestError::Extraction("no text".into()).is_retryable());
        assert!(!IngestError::Timeout.is_retryable());
        assert!(!IngestError::NotFound("x".into()).is_retryable());
    }

    #[test]
    fn timeout_message_is_bare() {
        assert_eq!(IngestError::Timeout.to_string(), "timeout");
    }
}
