//! Export reading error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading Keycloak export files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export directory or a file in it could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Path being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A file parsed as JSON but does not have the expected layout.
    #[error("invalid file format in {path}: {reason}")]
    InvalidFormat {
        /// Offending file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The embedded user profile configuration could not be parsed.
    #[error("invalid user profile configuration: {0}")]
    UserProfile(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export reading.
pub type ExportResult<T> = Result<T, ExportError>;
