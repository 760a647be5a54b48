//! GitHub client for reading catalog repositories.

use hub_core::{RemoteError, RepoCoordinates};
use url::Url;

use crate::config::GithubClientConfig;
use crate::error::GithubResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{ContentEntry, FileContent};
use crate::port::map_error;
use crate::url::build_contents_url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default GitHub client using the reqwest HTTP backend.
pub type DefaultGithubClient = GithubClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the GitHub contents API.
///
/// Generic over an HTTP backend so tests can substitute canned responses.
/// Production code uses `DefaultGithubClient` through the
/// `RemoteRepositoryReader` trait.
pub struct GithubClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: Url,
}

impl DefaultGithubClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with `RemoteError::Configuration` when the base URL is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: &GithubClientConfig) -> Result<Self, RemoteError> {
        Self::build(config).map_err(|e| map_error(e, ""))
    }

    fn build(config: &GithubClientConfig) -> GithubResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self { backend, base_url })
    }
}

impl<B: HttpBackend> GithubClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(base_url: Url, backend: B) -> Self {
        Self { backend, base_url }
    }

    /// List a directory. An empty `path` lists the repository root.
    pub(crate) async fn list_directory(
        &self,
        repo: &RepoCoordinates,
        path: &str,
    ) -> GithubResult<Vec<ContentEntry>> {
        let url = build_contents_url(&self.base_url, repo, path)?;
        let body = self.backend.get(&url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch a file and decode its content.
    pub(crate) async fn file_text(&self, repo: &RepoCoordinates, path: &str) -> GithubResult<String> {
        let url = build_contents_url(&self.base_url, repo, path)?;
        let body = self.backend.get(&url).await?;
        let file: FileContent = serde_json::from_slice(&body)?;
        file.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    #[test]
    fn test_default_client_creation() {
        assert!(DefaultGithubClient::new(&GithubClientConfig::new()).is_ok());
    }

    #[test]
    fn test_invalid_base_url_is_a_configuration_error() {
        let config = GithubClientConfig::new().with_base_url("not a url");
        assert!(matches!(
            DefaultGithubClient::new(&config),
            Err(RemoteError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_directory_requests_contents_endpoint() {
        let backend = FakeBackend::new().with_response(
            "/contents",
            CannedResponse::json(&json!([{"name": "buildah", "path": "buildah", "type": "dir"}])),
        );
        let client = GithubClient::with_backend(Url::parse("https://api.github.com").unwrap(), backend);
        let repo = RepoCoordinates::new("tektoncd", "catalog", "main");

        let entries = client.list_directory(&repo, "").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, "dir");
        assert_eq!(
            client.backend.requests(),
            vec!["https://api.github.com/repos/tektoncd/catalog/contents?ref=main"]
        );
    }
}
