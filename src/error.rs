//! Error types for Saga.

use thiserror::Error;

/// Library-level error type for Saga operations.
#[derive(Error, Debug)]
pub enum SagaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session notes error: {0}")]
    Notes(String),

    #[error("Audio processing failed: {0}")]
    Audio(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input is empty: {0}")]
    EmptyInput(String),
}

/// Result type alias for Saga operations.
pub type Result<T> = std::result::Result<T, SagaError>;
