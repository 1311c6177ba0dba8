//! Error types for the reasoning core

use thiserror::Error;

/// Errors raised synchronously by the reasoning core
#[derive(Error, Debug)]
pub enum ReasonerError {
    /// Malformed identifiers or empty required fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-finite relevance scores or concepts missing from the graph
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Empty rule set, zero iteration budget, depth decay outside (0, 1]
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A graph invariant was broken; the session must be abandoned
    #[error("Graph integrity violated: {0}")]
    Integrity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for reasoning operations
pub type ReasonerResult<T> = std::result::Result<T, ReasonerError>;
