//! Catalog sync service - reconciles a remote catalog tree into the store.
//!
//! A pass runs in two stages:
//!
//! 1. **Enumerate**: list the repository root and keep candidate directories.
//! 2. **Extract-or-skip**: for each candidate, read and extract its metadata,
//!    then insert, update or skip the stored resource.
//!
//! Directories are reconciled concurrently and independently. A failing
//! directory is recorded in the report and never aborts its siblings.

use futures_util::{StreamExt, stream};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::catalog::{ExtractedResource, Extraction, MetadataExtractor, select_candidates};
use crate::domain::{ErrorKind, Resource, SyncReport};
use crate::ports::{
    CoreError, RemoteEntry, RemoteError, RemoteRepositoryReader, RepoCoordinates,
    RepositoryError, ResourceRepository,
};
use crate::settings::{CatalogSettings, SettingsError};

/// Errors that fail a whole sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository root could not be listed.
    #[error("Failed to list catalog root of {repo}: {source}")]
    RootListing {
        repo: String,
        #[source]
        source: RemoteError,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl SyncError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RootListing { source, .. } => source.kind(),
            Self::Settings(_) => ErrorKind::Validation,
        }
    }
}

/// What happened to one candidate directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOutcome {
    Inserted(i64),
    Updated(i64),
    /// Stored content is identical to upstream.
    Unchanged(i64),
    /// No definition file.
    NotResource,
}

/// Service reconciling remote catalog trees into the resource store.
pub struct CatalogSyncService {
    resources: Arc<dyn ResourceRepository>,
    reader: Arc<dyn RemoteRepositoryReader>,
    extractor: MetadataExtractor,
    settings: CatalogSettings,
}

impl CatalogSyncService {
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        reader: Arc<dyn RemoteRepositoryReader>,
        settings: CatalogSettings,
    ) -> Self {
        let extractor = MetadataExtractor::new(
            Arc::clone(&reader),
            settings.retry,
            settings.max_description_len,
        );
        Self {
            resources,
            reader,
            extractor,
            settings,
        }
    }

    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Run a full pass over `repo`.
    pub async fn sync_catalog(&self, repo: &RepoCoordinates) -> Result<SyncReport, SyncError> {
        self.sync_with_cancel(repo, CancellationToken::new()).await
    }

    /// Run a pass that stops starting new directories once `cancel` fires.
    ///
    /// Directories already in flight run to completion and their writes are
    /// kept. Directories that never started are not counted.
    pub async fn sync_with_cancel(
        &self,
        repo: &RepoCoordinates,
        cancel: CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        self.settings.validate()?;

        let candidates = match self.enumerate_candidates(repo).await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::error!(
                    owner = %repo.owner,
                    repo = %repo.repository,
                    git_ref = %repo.git_ref,
                    error = %err,
                    "Catalog sync failed"
                );
                return Err(err);
            }
        };
        tracing::info!(
            owner = %repo.owner,
            repo = %repo.repository,
            candidates = candidates.len(),
            "Starting catalog sync"
        );

        let cancel = &cancel;
        let mut outcomes = stream::iter(candidates)
            .map(|entry| async move {
                if cancel.is_cancelled() {
                    return (entry.name, None);
                }
                let outcome = self.reconcile_directory(repo, &entry).await;
                (entry.name, Some(outcome))
            })
            .buffer_unordered(self.settings.concurrency);

        let mut report = SyncReport::default();
        while let Some((directory, outcome)) = outcomes.next().await {
            match outcome {
                None => report.cancelled = true,
                Some(Ok(DirectoryOutcome::Inserted(_))) => report.inserted += 1,
                Some(Ok(DirectoryOutcome::Updated(_))) => report.updated += 1,
                Some(Ok(DirectoryOutcome::Unchanged(_))) => report.skipped += 1,
                Some(Ok(DirectoryOutcome::NotResource)) => report.not_resources += 1,
                Some(Err(err)) => {
                    tracing::warn!(
                        owner = %repo.owner,
                        repo = %repo.repository,
                        directory = %directory,
                        kind = %err.kind(),
                        error = %err,
                        "Skipping catalog directory"
                    );
                    report.record_failure(directory, err.kind(), err.to_string());
                }
            }
        }

        report.failures.sort_by(|a, b| a.directory.cmp(&b.directory));
        tracing::info!(
            owner = %repo.owner,
            repo = %repo.repository,
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            not_resources = report.not_resources,
            cancelled = report.cancelled,
            "Catalog sync finished"
        );
        Ok(report)
    }

    /// Stage one: the directories of the repository root worth looking at.
    pub async fn enumerate_candidates(
        &self,
        repo: &RepoCoordinates,
    ) -> Result<Vec<RemoteEntry>, SyncError> {
        let entries = self
            .settings
            .retry
            .run("list_entries", "", || self.reader.list_entries(repo, ""))
            .await
            .map_err(|source| SyncError::RootListing {
                repo: repo.to_string(),
                source,
            })?;
        Ok(select_candidates(entries, &self.settings))
    }

    /// Stage two for one directory: extract, then insert, update or skip.
    ///
    /// All remote reads finish before the store is touched.
    pub async fn reconcile_directory(
        &self,
        repo: &RepoCoordinates,
        directory: &RemoteEntry,
    ) -> Result<DirectoryOutcome, CoreError> {
        let entries = self
            .settings
            .retry
            .run("list_entries", &directory.path, || {
                self.reader.list_entries(repo, &directory.path)
            })
            .await?;

        let extracted = match self.extractor.extract(repo, &directory.name, &entries).await? {
            Extraction::Resource(extracted) => extracted,
            Extraction::NotResource => {
                tracing::debug!(directory = %directory.name, "No definition file, not a resource");
                return Ok(DirectoryOutcome::NotResource);
            }
        };

        let existing = self
            .resources
            .find_by_location(&repo.owner, &repo.repository, &extracted.definition_path)
            .await?;

        match existing {
            Some(resource) => self.refresh(repo, &resource, &extracted).await,
            None => self.insert(repo, extracted).await,
        }
    }

    async fn insert(
        &self,
        repo: &RepoCoordinates,
        extracted: ExtractedResource,
    ) -> Result<DirectoryOutcome, CoreError> {
        let new_resource = extracted.clone().into_new_resource(repo);
        match self.resources.insert(&new_resource).await {
            Ok(resource) => {
                tracing::debug!(
                    directory = %resource.name,
                    resource_id = resource.id,
                    "Inserted catalog resource"
                );
                Ok(DirectoryOutcome::Inserted(resource.id))
            }
            // Another writer got there first; fall back to the update path.
            Err(RepositoryError::AlreadyExists(_)) => {
                let resource = self
                    .resources
                    .find_by_location(
                        &repo.owner,
                        &repo.repository,
                        &new_resource.github.path,
                    )
                    .await?
                    .ok_or_else(|| {
                        CoreError::Internal(format!(
                            "resource at {} vanished after a uniqueness conflict",
                            new_resource.github.path
                        ))
                    })?;
                self.refresh(repo, &resource, &extracted).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn refresh(
        &self,
        repo: &RepoCoordinates,
        resource: &Resource,
        extracted: &ExtractedResource,
    ) -> Result<DirectoryOutcome, CoreError> {
        if resource.content_hash == extracted.content_hash
            && resource.github.git_ref == repo.git_ref
        {
            tracing::debug!(
                directory = %extracted.name,
                resource_id = resource.id,
                "Catalog resource unchanged"
            );
            return Ok(DirectoryOutcome::Unchanged(resource.id));
        }

        self.resources
            .update_content(resource.id, &extracted.content_update(&repo.git_ref))
            .await?;
        tracing::debug!(
            directory = %extracted.name,
            resource_id = resource.id,
            "Updated catalog resource"
        );
        Ok(DirectoryOutcome::Updated(resource.id))
    }
}
