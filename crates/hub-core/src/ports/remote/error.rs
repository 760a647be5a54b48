//! Error types for remote repository reads.

use thiserror::Error;

use crate::domain::ErrorKind;

/// Errors from remote repository reads.
///
/// These are domain-level errors that consumers can handle.
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The requested path does not exist at the given ref.
    #[error("Remote path not found: {path}")]
    NotFound {
        /// The path that wasn't found
        path: String,
    },

    /// The remote throttled the request.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// Transient network or server-side failure.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// The remote answered with something we cannot interpret.
    #[error("Invalid remote response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// Client configuration or credentials are unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

impl RemoteError {
    /// Whether retrying the same call may succeed.
    ///
    /// Only throttling and transient network failures are retryable.
    /// `NotFound` is terminal for the path.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Network { .. })
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::Network { .. } => ErrorKind::TransientNetwork,
            Self::InvalidResponse { .. } => ErrorKind::Validation,
            Self::Configuration { .. } => ErrorKind::Internal,
        }
    }
}

/// Result type alias for remote repository reads.
pub type RemoteResult<T> = Result<T, RemoteError>;
