//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or HTTP types in any signature
//! - Repositories are the sole arbiters of concurrent access to stored state
//! - Remote reads are plain request/response; retry lives in the core

pub mod rating_repository;
pub mod remote;
pub mod resource_repository;

use std::sync::Arc;
use thiserror::Error;

use crate::domain::ErrorKind;
use crate::settings::SettingsError;

pub use rating_repository::RatingRepository;
pub use remote::{
    EntryKind, RemoteEntry, RemoteError, RemoteRepositoryReader, RemoteResult, RepoCoordinates,
};
pub use resource_repository::ResourceRepository;

/// Container for all repository trait objects.
///
/// This struct provides a consistent way to wire repositories across adapters
/// without coupling them to concrete implementations. It lives in `hub-core`
/// so that `HubCore` can accept it without depending on `hub-db`.
#[derive(Clone)]
pub struct Repos {
    /// Catalog resources, labels and GitHub details.
    pub resources: Arc<dyn ResourceRepository>,
    /// Per-user ratings and aggregates.
    pub ratings: Arc<dyn RatingRepository>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        ratings: Arc<dyn RatingRepository>,
    ) -> Self {
        Self { resources, ratings }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A compare-and-swap precondition did not hold.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key, check constraint).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepositoryError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) | Self::Conflict(_) => ErrorKind::Conflict,
            Self::Constraint(_) => ErrorKind::Validation,
            Self::Storage(_) | Self::Serialization(_) => ErrorKind::Store,
        }
    }
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core services.
/// Adapters should map this to their own error types (HTTP status codes,
/// CLI exit codes) through [`CoreError::kind`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Remote repository read failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller's view of the data is stale.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The addressed entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Machine-readable category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(err) => err.kind(),
            Self::Remote(err) => err.kind(),
            Self::Settings(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
