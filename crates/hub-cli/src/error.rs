//! CLI-specific error types and mappings.
//!
//! Maps core errors to exit codes and user-facing messages. Exit codes follow
//! sysexits.h where a category fits.

use hub_core::{CoreError, ErrorKind, SyncError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The addressed resource or rating does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A concurrent change or duplicate was detected.
    #[error("{0}")]
    Conflict(String),

    /// Invalid input.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The catalog repository could not be reached or throttled us.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("{0}")]
    Internal(String),
}

impl CliError {
    /// Map error to the process exit code.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 65, // EX_DATAERR
            Self::NotFound(_) => 66,  // EX_NOINPUT
            Self::Remote(_) => 69,    // EX_UNAVAILABLE
            Self::Internal(_) => 70,  // EX_SOFTWARE
            Self::Database(_) => 73,  // EX_CANTCREAT
            Self::Io(_) => 74,        // EX_IOERR
            Self::Conflict(_) => 75,  // EX_TEMPFAIL
            Self::Config(_) => 78,    // EX_CONFIG
        }
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Validation => Self::Arguments(message),
            ErrorKind::RateLimited | ErrorKind::TransientNetwork => Self::Remote(message),
            ErrorKind::Store => Self::Database(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Settings(settings_err) => Self::Config(settings_err.to_string()),
            other => Self::from_kind(other.kind(), other.to_string()),
        }
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Settings(settings_err) => Self::Config(settings_err.to_string()),
            SyncError::RootListing { .. } => Self::from_kind(err.kind(), err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
