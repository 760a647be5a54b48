//! Resource repository trait definition.
//!
//! This port defines the interface for catalog persistence operations.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{CategoryTags, NewResource, Resource, ResourceContentUpdate, ResourceFilter};

/// Repository for catalog resources, their GitHub details and labels.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - Every mutation touching more than one relation is atomic
/// - Tag and category names arrive normalized (see `normalize_names`)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Look up a resource by its remote location.
    async fn find_by_location(
        &self,
        owner: &str,
        repository: &str,
        path: &str,
    ) -> Result<Option<Resource>, RepositoryError>;

    /// Get a resource by its store ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the resource doesn't exist.
    async fn get_by_id(&self, id: i64) -> Result<Resource, RepositoryError>;

    /// Insert a resource together with its GitHub details and labels.
    ///
    /// Returns `Err(RepositoryError::AlreadyExists)` if a resource with the
    /// same `(owner, repository, path)` already exists.
    async fn insert(&self, resource: &NewResource) -> Result<Resource, RepositoryError>;

    /// Replace the synced content of an existing resource in place.
    ///
    /// Rating, download count, verification flag and submitter are preserved.
    async fn update_content(
        &self,
        id: i64,
        update: &ResourceContentUpdate,
    ) -> Result<(), RepositoryError>;

    /// List resources matching a filter, best rated first.
    async fn query(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, RepositoryError>;

    /// List resources submitted by a user.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Resource>, RepositoryError>;

    /// Delete a resource and everything hanging off it (labels, details, ratings).
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// All tag names in use, sorted.
    async fn list_tags(&self) -> Result<Vec<String>, RepositoryError>;

    /// Categories in use with the tags of their resources.
    async fn categories_with_tags(&self) -> Result<Vec<CategoryTags>, RepositoryError>;

    /// Increment the download counter, returning the new value.
    async fn increment_downloads(&self, id: i64) -> Result<i64, RepositoryError>;
}
