//! Rating service - per-user star ratings and the resource aggregate.

use std::sync::Arc;

use crate::domain::{MAX_STARS, MIN_STARS, RatingSummary, is_valid_stars};
use crate::ports::{CoreError, RatingRepository, RepositoryError};

/// Service for rating operations.
///
/// Validation happens here; atomicity of the row change and the aggregate
/// recompute is the repository's job.
pub struct RatingService {
    repo: Arc<dyn RatingRepository>,
}

fn validate_stars(stars: u8) -> Result<(), CoreError> {
    if is_valid_stars(stars) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "stars must be between {MIN_STARS} and {MAX_STARS}, got {stars}"
        )))
    }
}

fn map_repo_error(err: RepositoryError) -> CoreError {
    match err {
        RepositoryError::NotFound(msg) => CoreError::NotFound(msg),
        RepositoryError::AlreadyExists(msg) | RepositoryError::Conflict(msg) => {
            CoreError::Conflict(msg)
        }
        other => CoreError::Repository(other),
    }
}

impl RatingService {
    pub fn new(repo: Arc<dyn RatingRepository>) -> Self {
        Self { repo }
    }

    /// Record a user's first rating of a resource.
    ///
    /// Fails with `Conflict` if the user already rated it; use
    /// [`update_rating`](Self::update_rating) to change an existing rating.
    pub async fn add_rating(
        &self,
        user_id: i64,
        resource_id: i64,
        stars: u8,
    ) -> Result<RatingSummary, CoreError> {
        validate_stars(stars)?;
        let summary = self
            .repo
            .insert(user_id, resource_id, stars)
            .await
            .map_err(map_repo_error)?;
        tracing::debug!(user_id, resource_id, stars, "Rating added");
        Ok(summary)
    }

    /// Replace a rating, provided the caller's `prev_stars` is still current.
    pub async fn update_rating(
        &self,
        user_id: i64,
        resource_id: i64,
        new_stars: u8,
        prev_stars: u8,
    ) -> Result<RatingSummary, CoreError> {
        validate_stars(new_stars)?;
        validate_stars(prev_stars)?;
        let summary = self
            .repo
            .compare_and_swap(user_id, resource_id, prev_stars, new_stars)
            .await
            .map_err(map_repo_error)?;
        tracing::debug!(user_id, resource_id, prev_stars, new_stars, "Rating updated");
        Ok(summary)
    }

    /// The user's current stars for a resource, if rated.
    pub async fn get_user_rating(
        &self,
        user_id: i64,
        resource_id: i64,
    ) -> Result<Option<u8>, CoreError> {
        let rating = self.repo.get(user_id, resource_id).await?;
        Ok(rating.map(|r| r.stars))
    }

    pub async fn get_rating_summary(&self, resource_id: i64) -> Result<RatingSummary, CoreError> {
        self.repo.summary(resource_id).await.map_err(map_repo_error)
    }
}
