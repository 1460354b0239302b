//! Migration error types.

use thiserror::Error;

/// Migration error type.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A password credential uses an algorithm the destination cannot import.
    #[error("unsupported password algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A credential's embedded data is malformed.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A user has neither a username nor an email.
    #[error("user has no username or email")]
    MissingLoginId,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Migration result type.
pub type MigrateResult<T> = Result<T, MigrateError>;
