//! In-memory test doubles for the core ports.
//!
//! Available in this crate's tests and to other crates through the
//! `test-utils` feature.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::ports::{RemoteEntry, RemoteError, RemoteRepositoryReader, RemoteResult, RepoCoordinates};

#[derive(Default)]
struct FakeTree {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
    failures: HashMap<String, VecDeque<RemoteError>>,
    calls: HashMap<String, usize>,
    cancel_on_list: HashMap<String, CancellationToken>,
}

/// A remote tree held in memory.
///
/// Directory listings are derived from the file paths, so adding
/// `buildah/buildah.yaml` makes `buildah` appear in the root listing. Failures
/// can be queued per path and are returned before the real answer. The
/// coordinates passed to the reader are ignored.
#[derive(Default)]
pub struct FakeReader {
    tree: Mutex<FakeTree>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, FakeTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add (or replace) a file.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Add an empty directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<String>) -> Self {
        self.tree().dirs.insert(path.into());
        self
    }

    /// Add or replace a file after construction.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.tree().files.insert(path.into(), content.into());
    }

    /// Make the next call on `path` fail with `error`.
    pub fn fail_next(&self, path: impl Into<String>, error: RemoteError) {
        self.fail_times(path, error, 1);
    }

    /// Make the next `times` calls on `path` fail with `error`.
    pub fn fail_times(&self, path: impl Into<String>, error: RemoteError, times: usize) {
        let mut tree = self.tree();
        let queue = tree.failures.entry(path.into()).or_default();
        queue.extend(std::iter::repeat_n(error, times));
    }

    /// Cancel `token` when `path` is listed.
    pub fn cancel_on_list(&self, path: impl Into<String>, token: CancellationToken) {
        self.tree().cancel_on_list.insert(path.into(), token);
    }

    /// Number of reads (listings and fetches) issued for `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.tree().calls.get(path).copied().unwrap_or(0)
    }

    /// Synchronous directory listing, ignoring queued failures and counters.
    pub fn list(&self, path: &str) -> RemoteResult<Vec<RemoteEntry>> {
        let tree = self.tree();
        list_tree(&tree, path)
    }

    fn begin_call(&self, path: &str) -> RemoteResult<()> {
        let mut tree = self.tree();
        *tree.calls.entry(path.to_string()).or_insert(0) += 1;
        match tree.failures.get_mut(path).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn list_tree(tree: &FakeTree, path: &str) -> RemoteResult<Vec<RemoteEntry>> {
    let path = path.trim_matches('/');
    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    };

    let mut files = BTreeSet::new();
    let mut dirs = BTreeSet::new();
    let known = tree.files.keys().chain(tree.dirs.iter());
    for key in known {
        let Some(rest) = key.strip_prefix(&prefix) else {
            continue;
        };
        match rest.split_once('/') {
            Some((dir, _)) => {
                dirs.insert(dir.to_string());
            }
            None if tree.dirs.contains(key) => {
                dirs.insert(rest.to_string());
            }
            None if !rest.is_empty() => {
                files.insert(rest.to_string());
            }
            None => {}
        }
    }

    let exists = path.is_empty() || tree.dirs.contains(path) || !(files.is_empty() && dirs.is_empty());
    if !exists {
        return Err(RemoteError::NotFound {
            path: path.to_string(),
        });
    }

    let entries = dirs
        .into_iter()
        .map(|name| RemoteEntry::dir(&name, join(path, &name)))
        .chain(
            files
                .into_iter()
                .map(|name| RemoteEntry::file(&name, join(path, &name))),
        )
        .collect();
    Ok(entries)
}

#[async_trait]
impl RemoteRepositoryReader for FakeReader {
    async fn list_entries(
        &self,
        _repo: &RepoCoordinates,
        path: &str,
    ) -> RemoteResult<Vec<RemoteEntry>> {
        self.begin_call(path)?;
        let tree = self.tree();
        if let Some(token) = tree.cancel_on_list.get(path) {
            token.cancel();
        }
        list_tree(&tree, path)
    }

    async fn fetch_file(&self, _repo: &RepoCoordinates, path: &str) -> RemoteResult<String> {
        self.begin_call(path)?;
        self.tree()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoCoordinates {
        RepoCoordinates::new("o", "r", "main")
    }

    #[tokio::test]
    async fn test_listing_is_derived_from_files() {
        let reader = FakeReader::new()
            .with_file("README.md", "# Catalog")
            .with_file("buildah/buildah.yaml", "kind: Task")
            .with_file("buildah/samples/run.yaml", "kind: TaskRun")
            .with_dir("empty");

        let root = reader.list_entries(&repo(), "").await.unwrap();
        assert_eq!(
            root,
            vec![
                RemoteEntry::dir("buildah", "buildah"),
                RemoteEntry::dir("empty", "empty"),
                RemoteEntry::file("README.md", "README.md"),
            ]
        );

        let buildah = reader.list_entries(&repo(), "buildah").await.unwrap();
        assert_eq!(
            buildah,
            vec![
                RemoteEntry::dir("samples", "buildah/samples"),
                RemoteEntry::file("buildah.yaml", "buildah/buildah.yaml"),
            ]
        );

        assert!(reader.list_entries(&repo(), "empty").await.unwrap().is_empty());
        assert!(matches!(
            reader.list_entries(&repo(), "missing").await,
            Err(RemoteError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_queued_failures_come_first() {
        let reader = FakeReader::new().with_file("a.yaml", "kind: Task");
        reader.fail_times("a.yaml", RemoteError::RateLimited, 2);

        assert_eq!(
            reader.fetch_file(&repo(), "a.yaml").await,
            Err(RemoteError::RateLimited)
        );
        assert_eq!(
            reader.fetch_file(&repo(), "a.yaml").await,
            Err(RemoteError::RateLimited)
        );
        assert_eq!(
            reader.fetch_file(&repo(), "a.yaml").await.unwrap(),
            "kind: Task"
        );
        assert_eq!(reader.calls("a.yaml"), 3);
    }
}
