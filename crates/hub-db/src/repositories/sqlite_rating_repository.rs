//! `SQLite` implementation of the `RatingRepository` trait.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

use hub_core::{Rating, RatingRepository, RatingSummary, RepositoryError};

use super::row_mappers::{is_unique_violation, now_string, row_to_rating, storage_error};

fn resource_not_found(resource_id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Resource with ID {resource_id}"))
}

/// Take the write lock and check the resource exists.
///
/// A no-op write as the first statement makes SQLite acquire the write lock
/// up front, so two raters of the same resource never hold a read snapshot
/// and then race to upgrade it.
async fn lock_resource(conn: &mut SqliteConnection, resource_id: i64) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE resource SET rating = rating WHERE id = ?")
        .bind(resource_id)
        .execute(&mut *conn)
        .await
        .map_err(storage_error)?;

    if result.rows_affected() == 0 {
        return Err(resource_not_found(resource_id));
    }
    Ok(())
}

/// Read the stored aggregate and rating count of a resource.
async fn load_summary(
    conn: &mut SqliteConnection,
    resource_id: i64,
) -> Result<RatingSummary, RepositoryError> {
    let (average, count): (f64, i64) = sqlx::query_as(
        r"SELECT r.rating, (SELECT COUNT(*) FROM rating WHERE resource_id = r.id)
            FROM resource r WHERE r.id = ?",
    )
    .bind(resource_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage_error)?
    .ok_or_else(|| resource_not_found(resource_id))?;

    Ok(RatingSummary {
        resource_id,
        average,
        count: u64::try_from(count).unwrap_or_default(),
    })
}

/// Recompute the aggregate from the rating rows and return it.
async fn recompute(
    conn: &mut SqliteConnection,
    resource_id: i64,
) -> Result<RatingSummary, RepositoryError> {
    sqlx::query(
        r"UPDATE resource
             SET rating = COALESCE((SELECT AVG(stars) FROM rating WHERE resource_id = ?), 0)
           WHERE id = ?",
    )
    .bind(resource_id)
    .bind(resource_id)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?;

    load_summary(conn, resource_id).await
}

/// `SQLite` implementation of the `RatingRepository` trait.
///
/// Every mutation changes the rating row and the resource aggregate in one
/// transaction.
pub struct SqliteRatingRepository {
    pool: SqlitePool,
}

impl SqliteRatingRepository {
    /// Create a new `SQLite` rating repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for SqliteRatingRepository {
    async fn insert(
        &self,
        user_id: i64,
        resource_id: i64,
        stars: u8,
    ) -> Result<RatingSummary, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        lock_resource(&mut tx, resource_id).await?;

        sqlx::query(
            r"INSERT INTO rating (user_id, resource_id, stars, prev_stars, updated_at)
              VALUES (?, ?, ?, 0, ?)",
        )
        .bind(user_id)
        .bind(resource_id)
        .bind(i64::from(stars))
        .bind(now_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::AlreadyExists(format!(
                    "User {user_id} already rated resource {resource_id}"
                ))
            } else {
                storage_error(e)
            }
        })?;

        let summary = recompute(&mut tx, resource_id).await?;
        tx.commit().await.map_err(storage_error)?;
        Ok(summary)
    }

    async fn compare_and_swap(
        &self,
        user_id: i64,
        resource_id: i64,
        expected: u8,
        stars: u8,
    ) -> Result<RatingSummary, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        lock_resource(&mut tx, resource_id).await?;

        let result = sqlx::query(
            r"UPDATE rating
                 SET prev_stars = stars, stars = ?, updated_at = ?
               WHERE user_id = ? AND resource_id = ? AND stars = ?",
        )
        .bind(i64::from(stars))
        .bind(now_string())
        .bind(user_id)
        .bind(resource_id)
        .bind(i64::from(expected))
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT stars FROM rating WHERE user_id = ? AND resource_id = ?")
                    .bind(user_id)
                    .bind(resource_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(storage_error)?;

            return Err(match actual {
                None => RepositoryError::NotFound(format!(
                    "No rating by user {user_id} for resource {resource_id}"
                )),
                Some(actual) => RepositoryError::Conflict(format!(
                    "expected previous rating {expected}, found {actual}"
                )),
            });
        }

        let summary = recompute(&mut tx, resource_id).await?;
        tx.commit().await.map_err(storage_error)?;
        Ok(summary)
    }

    async fn get(&self, user_id: i64, resource_id: i64) -> Result<Option<Rating>, RepositoryError> {
        let row = sqlx::query(
            r"SELECT user_id, resource_id, stars, prev_stars, updated_at
                FROM rating WHERE user_id = ? AND resource_id = ?",
        )
        .bind(user_id)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(row_to_rating).transpose()
    }

    async fn summary(&self, resource_id: i64) -> Result<RatingSummary, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        load_summary(&mut conn, resource_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SqliteResourceRepository;
    use crate::setup::setup_test_database;
    use hub_core::{GithubDetails, NewResource, ResourceKind, ResourceRepository};

    async fn setup() -> (SqliteRatingRepository, i64) {
        let pool = setup_test_database().await.unwrap();
        let resources = SqliteResourceRepository::new(pool.clone());
        let resource = resources
            .insert(&NewResource {
                name: "git-clone".to_string(),
                description: String::new(),
                kind: ResourceKind::Task,
                verified: true,
                user_id: None,
                github: GithubDetails {
                    owner: "tektoncd".to_string(),
                    repository: "catalog".to_string(),
                    git_ref: "main".to_string(),
                    path: "git-clone/git-clone.yaml".to_string(),
                    readme_path: String::new(),
                },
                tags: vec![],
                categories: vec![],
                content_hash: String::new(),
            })
            .await
            .unwrap();
        (SqliteRatingRepository::new(pool), resource.id)
    }

    fn assert_average(summary: RatingSummary, expected: f64) {
        assert!(
            (summary.average - expected).abs() < 1e-9,
            "average {} != {expected}",
            summary.average
        );
    }

    #[tokio::test]
    async fn test_insert_recomputes_mean() {
        let (repo, id) = setup().await;

        assert_average(repo.insert(1, id, 4).await.unwrap(), 4.0);
        let summary = repo.insert(2, id, 1).await.unwrap();
        assert_average(summary, 2.5);
        assert_eq!(summary.count, 2);

        let stored = repo.summary(id).await.unwrap();
        assert_eq!(stored.count, 2);
        assert_average(stored, 2.5);
    }

    #[tokio::test]
    async fn test_second_insert_is_rejected() {
        let (repo, id) = setup().await;
        repo.insert(1, id, 4).await.unwrap();

        let err = repo.insert(1, id, 2).await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
        assert_average(repo.summary(id).await.unwrap(), 4.0);
    }

    #[tokio::test]
    async fn test_rating_missing_resource() {
        let (repo, _) = setup().await;
        assert!(matches!(
            repo.insert(1, 999, 3).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.summary(999).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let (repo, id) = setup().await;
        repo.insert(7, id, 4).await.unwrap();

        let summary = repo.compare_and_swap(7, id, 4, 5).await.unwrap();
        assert_average(summary, 5.0);

        let rating = repo.get(7, id).await.unwrap().unwrap();
        assert_eq!(rating.stars, 5);
        assert_eq!(rating.prev_stars, 4);

        let err = repo.compare_and_swap(7, id, 4, 3).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref msg) if msg.contains("found 5")));
        assert_eq!(repo.get(7, id).await.unwrap().unwrap().stars, 5);
        assert_average(repo.summary(id).await.unwrap(), 5.0);
    }

    #[tokio::test]
    async fn test_compare_and_swap_without_rating() {
        let (repo, id) = setup().await;
        assert!(matches!(
            repo.compare_and_swap(7, id, 4, 5).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repo.get(7, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_without_ratings() {
        let (repo, id) = setup().await;
        let summary = repo.summary(id).await.unwrap();
        assert_eq!(summary.count, 0);
        assert_average(summary, 0.0);
    }
}
