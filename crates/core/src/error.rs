//! Error types for the GEMS Agent.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, generation, retrieval, prompt
//! rendering and input validation.

use thiserror::Error;

/// Unified error type for the GEMS Agent.
///
/// Generation and retrieval failures are usually recovered inside the
/// answering pipeline; the variants still exist so collaborators can report
/// what went wrong before the pipeline decides to fall back.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation backend errors (endpoint or foundation model)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Retrieval service errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The query was empty or whitespace only
    #[error("Message cannot be empty")]
    EmptyQuery,

    /// An external call exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
