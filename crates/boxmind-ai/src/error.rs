//! Error types for the context module

use thiserror::Error;

/// Context continuity error types
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("Empty summary returned by {0}")]
    EmptySummary(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for context operations
pub type Result<T> = std::result::Result<T, ContextError>;
