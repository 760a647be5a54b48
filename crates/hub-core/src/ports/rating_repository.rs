//! Rating repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Rating, RatingSummary};

/// Repository for per-user ratings and the aggregate stored on each resource.
///
/// Every mutation writes the rating row and the recomputed aggregate in one
/// transaction, so a concurrent reader never observes them out of step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert a first rating for `(user_id, resource_id)`.
    ///
    /// Returns `Err(RepositoryError::AlreadyExists)` if the user already rated
    /// the resource and `Err(RepositoryError::NotFound)` if the resource is absent.
    async fn insert(
        &self,
        user_id: i64,
        resource_id: i64,
        stars: u8,
    ) -> Result<RatingSummary, RepositoryError>;

    /// Replace a rating only if its stored value equals `expected`.
    ///
    /// Returns `Err(RepositoryError::Conflict)` when the stored value differs
    /// and `Err(RepositoryError::NotFound)` when there is nothing to replace.
    async fn compare_and_swap(
        &self,
        user_id: i64,
        resource_id: i64,
        expected: u8,
        stars: u8,
    ) -> Result<RatingSummary, RepositoryError>;

    /// The user's active rating, if any.
    async fn get(&self, user_id: i64, resource_id: i64)
    -> Result<Option<Rating>, RepositoryError>;

    /// Aggregate and count for a resource.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the resource doesn't exist.
    async fn summary(&self, resource_id: i64) -> Result<RatingSummary, RepositoryError>;
}
