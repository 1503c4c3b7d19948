//! Unified error type used across all Kemet crates.

use thiserror::Error;

/// Result alias using the Kemet error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur anywhere in the analysis pipeline.
///
/// The retry layer classifies inference errors by message content, so
/// provider failures must preserve the status code and body text they
/// were built from.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (credentials, endpoints).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied input that cannot be processed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-side failure during a generation call.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Transport-level failure reaching the provider.
    #[error("Request error: {0}")]
    Request(String),

    /// JSON serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Model output that does not match the expected record shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O failure (reading image files, writing reports).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::InvalidInput(format!("Invalid base64 data: {}", e))
    }
}
