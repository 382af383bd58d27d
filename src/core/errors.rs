//! Custom error types for translation and dataset operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API request failed with an HTTP status
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Network-level failure (connect, timeout, DNS)
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Transient failures exhausted the retry budget
    #[error("API request failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        attempts: u32,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Language pair not supported by the selected provider
    #[error("Provider {provider} does not support {source} -> {target}")]
    UnsupportedPair {
        provider: String,
        source: String,
        target: String,
    },

    /// No provider registered under this name
    #[error("Unknown provider: {name}")]
    UnknownProvider {
        name: String,
    },

    /// Required credential is absent from the environment
    #[error("Missing credential: {variable} is not set")]
    MissingCredential {
        variable: String,
    },

    /// Missing required field in a provider record
    #[error("Missing required field: {field}")]
    MissingField {
        field: String,
    },

    /// Dataset catalog or cache failure
    #[error("Dataset error: {name} - {message}")]
    DatasetError {
        name: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Whether a retry may succeed: network failures, 5xx, and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            TranslationError::NetworkError { .. } => true,
            TranslationError::ApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
