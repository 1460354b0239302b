//! Management API error types.

use thiserror::Error;

/// Errors returned by the management API client.
#[derive(Debug, Error)]
pub enum DescopeError {
    /// Client construction or configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status returned by the API.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DescopeError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Management API result type.
pub type DescopeResult<T> = Result<T, DescopeError>;
