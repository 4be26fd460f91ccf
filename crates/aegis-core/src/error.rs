//! Error types for Aegis platform operations.
//!
//! This module provides the error hierarchy shared by all Aegis client crates,
//! including conversions from the underlying HTTP and serialization layers.

use thiserror::Error;

/// Main error type for Aegis platform operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication against the platform failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for the platform: {0}")]
    Timeout(String),

    /// Platform endpoint is unreachable or unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A listing endpoint returned a non-success status; fatal for the run
    #[error("API call failed with status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body, carried verbatim for diagnostics
        body: String,
    },

    /// Failed to parse a platform response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid endpoint URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential or profile store error
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// Input file missing or unreadable
    #[error("Input file error: {0}")]
    InputFile(String),
}

/// Specialized result type for Aegis operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::UnexpectedStatus`] from a status code and body.
    #[must_use]
    pub fn unexpected_status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
