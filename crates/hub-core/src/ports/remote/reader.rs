//! Remote repository reader port trait.

use super::error::RemoteResult;
use super::types::{RemoteEntry, RepoCoordinates};
use async_trait::async_trait;

/// Port trait for reading a remote source tree.
///
/// This is the only capability the catalog sync consumes from the hosting
/// service. Implementations must not retry on their own: retry with backoff
/// is owned by the caller's `RetryPolicy`.
///
/// # Design
///
/// - Uses core-owned DTOs, not hosting API types
/// - Returns `RemoteError` for all failures
/// - Paths are relative to the repository root; `""` is the root itself
#[async_trait]
pub trait RemoteRepositoryReader: Send + Sync {
    /// List the entries of a directory.
    async fn list_entries(
        &self,
        repo: &RepoCoordinates,
        path: &str,
    ) -> RemoteResult<Vec<RemoteEntry>>;

    /// Fetch the textual content of a file.
    async fn fetch_file(&self, repo: &RepoCoordinates, path: &str) -> RemoteResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn RemoteRepositoryReader>) {}
}
