//! `SQLite` implementation of the `ResourceRepository` trait.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::{BTreeMap, BTreeSet};

use hub_core::{
    CategoryTags, NewResource, RepositoryError, Resource, ResourceContentUpdate, ResourceFilter,
    ResourceRepository,
};

use super::row_mappers::{
    RESOURCE_SELECT, is_unique_violation, now_string, row_to_resource, storage_error,
};

/// A many-to-many label relation.
#[derive(Debug, Clone, Copy)]
enum Label {
    Tag,
    Category,
}

impl Label {
    const fn table(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Category => "category",
        }
    }

    const fn link_table(self) -> &'static str {
        match self {
            Self::Tag => "resource_tag",
            Self::Category => "resource_category",
        }
    }

    const fn link_column(self) -> &'static str {
        match self {
            Self::Tag => "tag_id",
            Self::Category => "category_id",
        }
    }
}

/// Attach `names` to a resource, creating missing label rows.
async fn attach_labels(
    conn: &mut SqliteConnection,
    resource_id: i64,
    label: Label,
    names: &[String],
) -> Result<(), RepositoryError> {
    let insert_label = format!(
        "INSERT INTO {} (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
        label.table()
    );
    let link = format!(
        "INSERT OR IGNORE INTO {} (resource_id, {}) SELECT ?, id FROM {} WHERE name = ?",
        label.link_table(),
        label.link_column(),
        label.table()
    );

    for name in names {
        sqlx::query(&insert_label)
            .bind(name)
            .execute(&mut *conn)
            .await
            .map_err(storage_error)?;
        sqlx::query(&link)
            .bind(resource_id)
            .bind(name)
            .execute(&mut *conn)
            .await
            .map_err(storage_error)?;
    }
    Ok(())
}

async fn detach_labels(
    conn: &mut SqliteConnection,
    resource_id: i64,
    label: Label,
) -> Result<(), RepositoryError> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE resource_id = ?",
        label.link_table()
    ))
    .bind(resource_id)
    .execute(&mut *conn)
    .await
    .map_err(storage_error)?;
    Ok(())
}

/// `SQLite` implementation of the `ResourceRepository` trait.
///
/// Multi-table writes (insert, content update, delete) each run in a single
/// transaction.
pub struct SqliteResourceRepository {
    pool: SqlitePool,
}

impl SqliteResourceRepository {
    /// Create a new `SQLite` resource repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (for testing only).
    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ResourceRepository for SqliteResourceRepository {
    async fn find_by_location(
        &self,
        owner: &str,
        repository: &str,
        path: &str,
    ) -> Result<Option<Resource>, RepositoryError> {
        let query = format!(
            "{RESOURCE_SELECT} WHERE g.owner = ? AND g.repository = ? AND g.path = ?"
        );

        let row = sqlx::query(&query)
            .bind(owner)
            .bind(repository)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_resource).transpose()
    }

    async fn get_by_id(&self, id: i64) -> Result<Resource, RepositoryError> {
        let query = format!("{RESOURCE_SELECT} WHERE r.id = ?");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Resource with ID {id}")))?;

        row_to_resource(&row)
    }

    async fn insert(&self, resource: &NewResource) -> Result<Resource, RepositoryError> {
        let now = now_string();
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let id: i64 = sqlx::query_scalar(
            r"INSERT INTO resource (
                name, description, kind, rating, downloads, verified, user_id,
                content_hash, created_at, updated_at
            ) VALUES (?, ?, ?, 0, 0, ?, ?, ?, ?, ?)
            RETURNING id",
        )
        .bind(&resource.name)
        .bind(&resource.description)
        .bind(resource.kind.as_str())
        .bind(resource.verified)
        .bind(resource.user_id)
        .bind(&resource.content_hash)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        let github = &resource.github;
        sqlx::query(
            r"INSERT INTO github_details (
                resource_id, owner, repository, git_ref, path, readme_path
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&github.owner)
        .bind(&github.repository)
        .bind(&github.git_ref)
        .bind(&github.path)
        .bind(&github.readme_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::AlreadyExists(format!(
                    "Resource at {}/{}/{}",
                    github.owner, github.repository, github.path
                ))
            } else {
                storage_error(e)
            }
        })?;

        attach_labels(&mut tx, id, Label::Tag, &resource.tags).await?;
        attach_labels(&mut tx, id, Label::Category, &resource.categories).await?;

        tx.commit().await.map_err(storage_error)?;

        self.get_by_id(id).await
    }

    async fn update_content(
        &self,
        id: i64,
        update: &ResourceContentUpdate,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let result = sqlx::query(
            "UPDATE resource SET description = ?, kind = ?, content_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&update.description)
        .bind(update.kind.as_str())
        .bind(&update.content_hash)
        .bind(now_string())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Resource with ID {id}")));
        }

        sqlx::query("UPDATE github_details SET git_ref = ?, readme_path = ? WHERE resource_id = ?")
            .bind(&update.git_ref)
            .bind(&update.readme_path)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        detach_labels(&mut tx, id, Label::Tag).await?;
        detach_labels(&mut tx, id, Label::Category).await?;
        attach_labels(&mut tx, id, Label::Tag, &update.tags).await?;
        attach_labels(&mut tx, id, Label::Category, &update.categories).await?;

        tx.commit().await.map_err(storage_error)
    }

    async fn query(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("{RESOURCE_SELECT} WHERE 1 = 1"));

        if let Some(kind) = filter.kind {
            builder.push(" AND r.kind = ").push_bind(kind.as_str());
        }
        if let Some(verified) = filter.verified {
            builder.push(" AND r.verified = ").push_bind(verified);
        }
        if !filter.tags.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM resource_tag rt JOIN tag t ON t.id = rt.tag_id \
                 WHERE rt.resource_id = r.id AND t.name IN (",
            );
            let mut names = builder.separated(", ");
            for tag in &filter.tags {
                names.push_bind(tag.as_str());
            }
            names.push_unseparated("))");
        }
        builder.push(" ORDER BY r.rating DESC, r.name ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_resource).collect()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Resource>, RepositoryError> {
        let query = format!("{RESOURCE_SELECT} WHERE r.user_id = ? ORDER BY r.name");

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_resource).collect()
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        for statement in [
            "DELETE FROM rating WHERE resource_id = ?",
            "DELETE FROM resource_tag WHERE resource_id = ?",
            "DELETE FROM resource_category WHERE resource_id = ?",
            "DELETE FROM github_details WHERE resource_id = ?",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;
        }

        let result = sqlx::query("DELETE FROM resource WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Resource with ID {id}")));
        }

        tx.commit().await.map_err(storage_error)
    }

    async fn list_tags(&self) -> Result<Vec<String>, RepositoryError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT t.name FROM tag t JOIN resource_tag rt ON rt.tag_id = t.id ORDER BY t.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn categories_with_tags(&self) -> Result<Vec<CategoryTags>, RepositoryError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            r"SELECT c.name, t.name
                FROM category c
                JOIN resource_category rc ON rc.category_id = c.id
                LEFT JOIN resource_tag rt ON rt.resource_id = rc.resource_id
                LEFT JOIN tag t ON t.id = rt.tag_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (category, tag) in rows {
            let tags = grouped.entry(category).or_default();
            if let Some(tag) = tag {
                tags.insert(tag);
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(name, tags)| CategoryTags {
                name,
                tags: tags.into_iter().collect(),
            })
            .collect())
    }

    async fn increment_downloads(&self, id: i64) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE resource SET downloads = downloads + 1 WHERE id = ? RETURNING downloads",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("Resource with ID {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;
    use hub_core::{GithubDetails, ResourceKind};

    async fn repo() -> SqliteResourceRepository {
        SqliteResourceRepository::new(setup_test_database().await.unwrap())
    }

    fn new_resource(name: &str, tags: &[&str], categories: &[&str]) -> NewResource {
        NewResource {
            name: name.to_string(),
            description: format!("{name} description"),
            kind: ResourceKind::Task,
            verified: true,
            user_id: None,
            github: GithubDetails {
                owner: "tektoncd".to_string(),
                repository: "catalog".to_string(),
                git_ref: "main".to_string(),
                path: format!("{name}/{name}.yaml"),
                readme_path: format!("{name}/README.md"),
            },
            tags: tags.iter().map(ToString::to_string).collect(),
            categories: categories.iter().map(ToString::to_string).collect(),
            content_hash: "hash-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_resource("buildah", &["image-build", "build"], &["image build"]))
            .await
            .unwrap();

        let fetched = repo.get_by_id(inserted.id).await.unwrap();
        assert_eq!(fetched.name, "buildah");
        assert_eq!(fetched.tags, vec!["build", "image-build"]);
        assert_eq!(fetched.categories, vec!["image build"]);
        assert!(fetched.verified);
        assert!((fetched.rating - 0.0).abs() < f64::EPSILON);
        assert_eq!(fetched.downloads, 0);
        assert_eq!(fetched.github.readme_path, "buildah/README.md");
    }

    #[tokio::test]
    async fn test_duplicate_location_is_rejected() {
        let repo = repo().await;
        repo.insert(&new_resource("buildah", &[], &[])).await.unwrap();

        let err = repo
            .insert(&new_resource("buildah", &["x"], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));

        // The failed insert left nothing behind
        let all = repo.query(&ResourceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(repo.list_tags().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_location() {
        let repo = repo().await;
        let inserted = repo.insert(&new_resource("git-clone", &[], &[])).await.unwrap();

        let found = repo
            .find_by_location("tektoncd", "catalog", "git-clone/git-clone.yaml")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(inserted.id));

        let missing = repo
            .find_by_location("tektoncd", "catalog", "nope/nope.yaml")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_content_replaces_labels_and_keeps_counters() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_resource("buildah", &["build"], &["image build"]))
            .await
            .unwrap();
        repo.increment_downloads(inserted.id).await.unwrap();

        repo.update_content(
            inserted.id,
            &ResourceContentUpdate {
                description: "New text.".to_string(),
                git_ref: "v2".to_string(),
                kind: ResourceKind::Pipeline,
                readme_path: String::new(),
                tags: vec!["containers".to_string()],
                categories: vec![],
                content_hash: "hash-2".to_string(),
            },
        )
        .await
        .unwrap();

        let updated = repo.get_by_id(inserted.id).await.unwrap();
        assert_eq!(updated.description, "New text.");
        assert_eq!(updated.kind, ResourceKind::Pipeline);
        assert_eq!(updated.tags, vec!["containers"]);
        assert!(updated.categories.is_empty());
        assert_eq!(updated.content_hash, "hash-2");
        assert_eq!(updated.downloads, 1);
        assert!(updated.verified);
        assert!(!updated.github.has_readme());
        assert_eq!(updated.github.git_ref, "v2");
        assert_eq!(repo.list_tags().await.unwrap(), vec!["containers"]);
    }

    #[tokio::test]
    async fn test_update_missing_resource() {
        let repo = repo().await;
        let err = repo
            .update_content(
                404,
                &ResourceContentUpdate {
                    description: String::new(),
                    git_ref: "main".to_string(),
                    kind: ResourceKind::Task,
                    readme_path: String::new(),
                    tags: vec![],
                    categories: vec![],
                    content_hash: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_query_filters() {
        let repo = repo().await;
        repo.insert(&new_resource("buildah", &["build"], &[])).await.unwrap();
        repo.insert(&new_resource("git-clone", &["git"], &[])).await.unwrap();
        let mut pipeline = new_resource("ci", &["git", "build"], &[]);
        pipeline.kind = ResourceKind::Pipeline;
        pipeline.verified = false;
        repo.insert(&pipeline).await.unwrap();

        let names = |resources: Vec<Resource>| -> Vec<String> {
            resources.into_iter().map(|r| r.name).collect()
        };

        let all = repo.query(&ResourceFilter::default()).await.unwrap();
        assert_eq!(names(all), vec!["buildah", "ci", "git-clone"]);

        let tasks = repo
            .query(&ResourceFilter::default().with_kind(ResourceKind::Task))
            .await
            .unwrap();
        assert_eq!(names(tasks), vec!["buildah", "git-clone"]);

        let git = repo
            .query(&ResourceFilter::default().with_tags(["git"]))
            .await
            .unwrap();
        assert_eq!(names(git), vec!["ci", "git-clone"]);

        let any_of = repo
            .query(&ResourceFilter::default().with_tags(["git", "build"]).with_verified(true))
            .await
            .unwrap();
        assert_eq!(names(any_of), vec!["buildah", "git-clone"]);

        let none = repo
            .query(&ResourceFilter::default().with_tags(["unknown"]))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_query_orders_by_rating() {
        let repo = repo().await;
        let low = repo.insert(&new_resource("a-task", &[], &[])).await.unwrap();
        let high = repo.insert(&new_resource("b-task", &[], &[])).await.unwrap();
        sqlx::query("UPDATE resource SET rating = ? WHERE id = ?")
            .bind(4.5)
            .bind(high.id)
            .execute(repo.pool())
            .await
            .unwrap();

        let all = repo.query(&ResourceFilter::default()).await.unwrap();
        assert_eq!(all[0].id, high.id);
        assert_eq!(all[1].id, low.id);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_resource("buildah", &["build"], &["image build"]))
            .await
            .unwrap();
        sqlx::query("INSERT INTO rating (user_id, resource_id, stars, prev_stars, updated_at) VALUES (1, ?, 4, 0, ?)")
            .bind(inserted.id)
            .bind(now_string())
            .execute(repo.pool())
            .await
            .unwrap();

        repo.delete(inserted.id).await.unwrap();

        assert!(matches!(
            repo.get_by_id(inserted.id).await,
            Err(RepositoryError::NotFound(_))
        ));
        for table in ["rating", "resource_tag", "resource_category", "github_details"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(repo.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} not cleaned up");
        }
        assert!(repo.list_tags().await.unwrap().is_empty());

        assert!(matches!(
            repo.delete(inserted.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_categories_with_tags() {
        let repo = repo().await;
        repo.insert(&new_resource("buildah", &["build", "image"], &["image build"]))
            .await
            .unwrap();
        repo.insert(&new_resource("kaniko", &["image"], &["image build"]))
            .await
            .unwrap();
        repo.insert(&new_resource("lint", &[], &["code quality"]))
            .await
            .unwrap();

        let categories = repo.categories_with_tags().await.unwrap();
        assert_eq!(
            categories,
            vec![
                CategoryTags {
                    name: "code quality".to_string(),
                    tags: vec![],
                },
                CategoryTags {
                    name: "image build".to_string(),
                    tags: vec!["build".to_string(), "image".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_by_user_and_downloads() {
        let repo = repo().await;
        let mut submitted = new_resource("mine", &[], &[]);
        submitted.user_id = Some(7);
        submitted.verified = false;
        let mine = repo.insert(&submitted).await.unwrap();
        repo.insert(&new_resource("theirs", &[], &[])).await.unwrap();

        let listed = repo.list_by_user(7).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);

        assert_eq!(repo.increment_downloads(mine.id).await.unwrap(), 1);
        assert_eq!(repo.increment_downloads(mine.id).await.unwrap(), 2);
        assert!(matches!(
            repo.increment_downloads(999).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
