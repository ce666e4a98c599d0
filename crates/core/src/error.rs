//! Error types for the qualcode CLI.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, LLM transport, response parsing,
//! and document structure.

use thiserror::Error;

/// Unified error type for the qualcode CLI.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
///
/// Note that most per-chunk failures (malformed model output, unmatched
/// excerpts, transport errors for a single chunk) are *not* represented
/// here: the coding pipeline recovers from them locally and continues.
/// Only run-fatal conditions become an `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Structural document errors (the only fatal class in the coding
    /// pipeline, e.g. a transcript with no extractable text)
    #[error("Document error: {0}")]
    Document(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

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
