//! Port trait implementation for `GithubClient`.
//!
//! Implements the core-owned `RemoteRepositoryReader` trait and converts
//! internal GitHub errors to `RemoteError`.

use async_trait::async_trait;
use hub_core::{RemoteEntry, RemoteError, RemoteRepositoryReader, RemoteResult, RepoCoordinates};

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `GithubError` to core `RemoteError`.
pub(crate) fn map_error(err: GithubError, path: &str) -> RemoteError {
    match err {
        GithubError::ApiRequestFailed { status, url } => match status {
            404 => RemoteError::NotFound {
                path: path.to_string(),
            },
            401 | 403 => RemoteError::Configuration {
                message: format!("GitHub refused access with status {status}: {url}"),
            },
            500..=599 => RemoteError::Network {
                message: format!("GitHub API request failed with status {status}: {url}"),
            },
            _ => RemoteError::InvalidResponse {
                message: format!("unexpected status {status}: {url}"),
            },
        },
        GithubError::RateLimitExceeded { .. } => RemoteError::RateLimited,
        GithubError::Network(e) => RemoteError::Network {
            message: e.to_string(),
        },
        GithubError::InvalidConfig { message } => RemoteError::Configuration { message },
        GithubError::InvalidUrl(e) => RemoteError::Configuration {
            message: e.to_string(),
        },
        GithubError::InvalidResponse { message } => RemoteError::InvalidResponse { message },
        GithubError::JsonParse(e) => RemoteError::InvalidResponse {
            message: format!("{path}: {e}"),
        },
        GithubError::Base64(e) => RemoteError::InvalidResponse {
            message: format!("{path}: {e}"),
        },
        GithubError::Utf8(e) => RemoteError::InvalidResponse {
            message: format!("{path}: {e}"),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> RemoteRepositoryReader for GithubClient<B> {
    async fn list_entries(
        &self,
        repo: &RepoCoordinates,
        path: &str,
    ) -> RemoteResult<Vec<RemoteEntry>> {
        let entries = self
            .list_directory(repo, path)
            .await
            .map_err(|e| map_error(e, path))?;
        Ok(entries.into_iter().map(RemoteEntry::from).collect())
    }

    async fn fetch_file(&self, repo: &RepoCoordinates, path: &str) -> RemoteResult<String> {
        self.file_text(repo, path)
            .await
            .map_err(|e| map_error(e, path))
    }
}
