//! Resource service - catalog queries and user-driven mutations.

use std::sync::Arc;

use crate::catalog::RetryPolicy;
use crate::domain::{
    CategoryTags, RawLinks, Resource, ResourceFilter, ResourceSubmission, normalize_names,
};
use crate::ports::{
    CoreError, RemoteRepositoryReader, RepoCoordinates, RepositoryError, ResourceRepository,
};

/// Service for catalog resources.
///
/// Reads delegate to the injected `ResourceRepository`. Definition and README
/// content is fetched live from the remote tree the resource points at.
pub struct ResourceService {
    repo: Arc<dyn ResourceRepository>,
    reader: Arc<dyn RemoteRepositoryReader>,
    retry: RetryPolicy,
}

impl ResourceService {
    pub fn new(
        repo: Arc<dyn ResourceRepository>,
        reader: Arc<dyn RemoteRepositoryReader>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            repo,
            reader,
            retry,
        }
    }

    /// Resources matching `filter`, best rated first.
    pub async fn query_resources(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, CoreError> {
        let filter = ResourceFilter {
            tags: normalize_names(&filter.tags),
            ..filter.clone()
        };
        self.repo.query(&filter).await.map_err(CoreError::from)
    }

    /// Get a resource by ID, `None` if it doesn't exist.
    pub async fn get_resource(&self, id: i64) -> Result<Option<Resource>, CoreError> {
        match self.repo.get_by_id(id).await {
            Ok(resource) => Ok(Some(resource)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(CoreError::from(e)),
        }
    }

    /// Get a resource by ID. Returns error if not found.
    pub async fn find_resource(&self, id: i64) -> Result<Resource, CoreError> {
        self.get_resource(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("resource {id}")))
    }

    pub async fn resources_by_user(&self, user_id: i64) -> Result<Vec<Resource>, CoreError> {
        self.repo.list_by_user(user_id).await.map_err(CoreError::from)
    }

    /// Delete a resource with its labels, GitHub details and ratings.
    pub async fn delete_resource(&self, id: i64) -> Result<(), CoreError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                tracing::info!(resource_id = id, "Resource deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound(msg)) => Err(CoreError::NotFound(msg)),
            Err(e) => Err(CoreError::from(e)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Labels
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_tags(&self) -> Result<Vec<String>, CoreError> {
        self.repo.list_tags().await.map_err(CoreError::from)
    }

    /// Categories with the tags used by resources in each of them.
    pub async fn categories_with_tags(&self) -> Result<Vec<CategoryTags>, CoreError> {
        self.repo.categories_with_tags().await.map_err(CoreError::from)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a user-submitted resource. Submissions are never verified.
    pub async fn submit_resource(
        &self,
        submission: ResourceSubmission,
    ) -> Result<Resource, CoreError> {
        validate_submission(&submission)?;
        let new_resource = submission.into_new_resource();

        match self.repo.insert(&new_resource).await {
            Ok(resource) => {
                tracing::info!(
                    resource_id = resource.id,
                    user_id = ?resource.user_id,
                    name = %resource.name,
                    "Resource submitted"
                );
                Ok(resource)
            }
            Err(RepositoryError::AlreadyExists(msg)) => Err(CoreError::Conflict(msg)),
            Err(e) => Err(CoreError::from(e)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Raw content URLs of the resource's files.
    pub async fn raw_links(&self, id: i64) -> Result<RawLinks, CoreError> {
        let resource = self.find_resource(id).await?;
        Ok(RawLinks::from(&resource.github))
    }

    /// The resource's definition file, fetched from its repository.
    pub async fn definition_content(&self, id: i64) -> Result<String, CoreError> {
        let resource = self.find_resource(id).await?;
        self.fetch(&resource, &resource.github.path).await
    }

    /// The resource's README, `None` when it has none.
    pub async fn readme_content(&self, id: i64) -> Result<Option<String>, CoreError> {
        let resource = self.find_resource(id).await?;
        if !resource.github.has_readme() {
            return Ok(None);
        }
        self.fetch(&resource, &resource.github.readme_path)
            .await
            .map(Some)
    }

    /// Count a download, returning the new total.
    pub async fn record_download(&self, id: i64) -> Result<i64, CoreError> {
        match self.repo.increment_downloads(id).await {
            Ok(downloads) => Ok(downloads),
            Err(RepositoryError::NotFound(msg)) => Err(CoreError::NotFound(msg)),
            Err(e) => Err(CoreError::from(e)),
        }
    }

    async fn fetch(&self, resource: &Resource, path: &str) -> Result<String, CoreError> {
        let repo = RepoCoordinates::new(
            &resource.github.owner,
            &resource.github.repository,
            &resource.github.git_ref,
        );
        self.retry
            .run("fetch_file", path, || self.reader.fetch_file(&repo, path))
            .await
            .map_err(CoreError::from)
    }
}

fn validate_submission(submission: &ResourceSubmission) -> Result<(), CoreError> {
    let required = [
        ("name", submission.name.as_str()),
        ("owner", submission.github.owner.as_str()),
        ("repository", submission.github.repository.as_str()),
        ("ref", submission.github.git_ref.as_str()),
        ("path", submission.github.path.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }

    let path = submission.github.path.to_ascii_lowercase();
    if !(path.ends_with(".yaml") || path.ends_with(".yml")) {
        return Err(CoreError::Validation(format!(
            "definition path must point at a YAML file, got '{}'",
            submission.github.path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, GithubDetails, ResourceKind};
    use crate::ports::resource_repository::MockResourceRepository;
    use crate::testing::FakeReader;
    use chrono::Utc;

    fn github(readme_path: &str) -> GithubDetails {
        GithubDetails {
            owner: "tektoncd".to_string(),
            repository: "catalog".to_string(),
            git_ref: "main".to_string(),
            path: "git-clone/git-clone.yaml".to_string(),
            readme_path: readme_path.to_string(),
        }
    }

    fn resource(id: i64, readme_path: &str) -> Resource {
        Resource {
            id,
            name: "git-clone".to_string(),
            description: "Clones a repository.".to_string(),
            kind: ResourceKind::Task,
            rating: 0.0,
            downloads: 0,
            verified: true,
            user_id: None,
            github: github(readme_path),
            tags: vec!["git".to_string()],
            categories: vec!["git".to_string()],
            content_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reader() -> Arc<FakeReader> {
        Arc::new(
            FakeReader::new()
                .with_file("git-clone/git-clone.yaml", "kind: Task\n")
                .with_file("git-clone/README.md", "# git-clone\nClones a repository."),
        )
    }

    fn service(repo: MockResourceRepository) -> ResourceService {
        ResourceService::new(Arc::new(repo), reader(), RetryPolicy::immediate(1))
    }

    #[tokio::test]
    async fn test_get_missing_resource_is_none() {
        let mut repo = MockResourceRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Err(RepositoryError::NotFound(format!("resource {id}"))));

        assert!(service(repo).get_resource(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_normalizes_tag_filter() {
        let mut repo = MockResourceRepository::new();
        repo.expect_query()
            .withf(|filter| filter.tags == vec!["git".to_string()])
            .returning(|_| Ok(vec![]));

        let filter = ResourceFilter::default().with_tags([" Git", "git"]);
        assert!(service(repo).query_resources(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_resource() {
        let mut repo = MockResourceRepository::new();
        repo.expect_delete()
            .returning(|id| Err(RepositoryError::NotFound(format!("resource {id}"))));

        let err = service(repo).delete_resource(3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_submission_validation() {
        let mut repo = MockResourceRepository::new();
        repo.expect_insert().never();
        let service = service(repo);

        let mut submission = ResourceSubmission {
            user_id: 7,
            name: "my-task".to_string(),
            description: String::new(),
            kind: ResourceKind::Task,
            github: github(""),
            tags: vec![],
            categories: vec![],
        };
        submission.github.path = "my-task/README.md".to_string();
        let err = service.submit_resource(submission.clone()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        submission.github.path = "my-task/my-task.yaml".to_string();
        submission.github.owner = " ".to_string();
        let err = service.submit_resource(submission).await.unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_a_conflict() {
        let mut repo = MockResourceRepository::new();
        repo.expect_insert()
            .withf(|r| !r.verified && r.user_id == Some(7))
            .returning(|_| Err(RepositoryError::AlreadyExists("location".to_string())));

        let submission = ResourceSubmission {
            user_id: 7,
            name: "git-clone".to_string(),
            description: String::new(),
            kind: ResourceKind::Task,
            github: github(""),
            tags: vec![],
            categories: vec![],
        };
        let err = service(repo).submit_resource(submission).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_content_is_fetched_from_stored_location() {
        let mut repo = MockResourceRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(resource(id, "git-clone/README.md")));
        let service = service(repo);

        assert_eq!(service.definition_content(1).await.unwrap(), "kind: Task\n");
        assert_eq!(
            service.readme_content(1).await.unwrap().as_deref(),
            Some("# git-clone\nClones a repository.")
        );
        let links = service.raw_links(1).await.unwrap();
        assert!(links.readme.is_some());
    }

    #[tokio::test]
    async fn test_readme_absent() {
        let mut repo = MockResourceRepository::new();
        repo.expect_get_by_id().returning(|id| Ok(resource(id, "")));

        assert_eq!(service(repo).readme_content(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_record_download() {
        let mut repo = MockResourceRepository::new();
        repo.expect_increment_downloads().returning(|_| Ok(11));

        assert_eq!(service(repo).record_download(1).await.unwrap(), 11);
    }
}
