//! Typed errors for the pain-point engine.
//!
//! The library uses `thiserror`; binaries wrap these in `anyhow`.

use thiserror::Error;

use crate::types::pain_point::PainPointId;

/// Errors that can occur while analyzing threads and persisting pain points.
#[derive(Debug, Error)]
pub enum PainPointError {
    /// The requested source thread does not exist
    #[error("Thread not found")]
    ThreadNotFound { thread_id: String },

    /// The extraction call failed. Displayed verbatim in batch reports.
    #[error("{0}")]
    Extraction(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Pain point not found in store
    #[error("pain point not found: {id}")]
    NotFound { id: PainPointId },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PainPointError {
    /// Wrap any displayable failure as a storage error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string().into())
    }

    /// Wrap any displayable failure as an extraction error.
    pub fn extraction(err: impl std::fmt::Display) -> Self {
        Self::Extraction(err.to_string().into())
    }
}

/// Result type alias for pain-point operations.
pub type Result<T> = std::result::Result<T, PainPointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_not_found_message_is_stable() {
        let err = PainPointError::ThreadNotFound {
            thread_id: "t3_abc".into(),
        };
        assert_eq!(err.to_string(), "Thread not found");
    }

    #[test]
    fn extraction_message_is_verbatim() {
        let err = PainPointError::extraction("rate limited by upstream");
        assert_eq!(err.to_string(), "rate limited by upstream");
    }
}
