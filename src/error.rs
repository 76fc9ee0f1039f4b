//! Wanderfeed error types

use serde::Serialize;
use thiserror::Error;

/// Wanderfeed error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The feed could not be fetched from the locations endpoint
    #[error("{0}")]
    Load(String),

    /// The server-side location dataset is missing or malformed
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// A post or route target does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Assistant exchange error
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// Location server error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for Wanderfeed operations
pub type Result<T> = std::result::Result<T, Error>;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}
