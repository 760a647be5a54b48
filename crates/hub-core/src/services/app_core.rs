//! `HubCore` - the primary application facade.
//!
//! This is the composition root for core services. Adapters receive a
//! `HubCore` instance and use it to access all functionality.

use std::sync::Arc;

use super::{CatalogSyncService, RatingService, ResourceService};
use crate::ports::{RemoteRepositoryReader, Repos};
use crate::settings::CatalogSettings;

/// The core application facade.
///
/// Constructed at the adapter's composition root with concrete repositories
/// and a remote reader.
///
/// # Example
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool);
/// let reader = Arc::new(DefaultGithubClient::new(&GithubConfig::default())?);
/// let core = HubCore::new(repos, reader, CatalogSettings::default());
///
/// let report = core.sync().sync_catalog(&repo).await?;
/// ```
pub struct HubCore {
    resources: ResourceService,
    ratings: RatingService,
    sync: CatalogSyncService,
}

impl HubCore {
    pub fn new(
        repos: Repos,
        reader: Arc<dyn RemoteRepositoryReader>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            resources: ResourceService::new(
                Arc::clone(&repos.resources),
                Arc::clone(&reader),
                settings.retry,
            ),
            ratings: RatingService::new(repos.ratings),
            sync: CatalogSyncService::new(repos.resources, reader, settings),
        }
    }

    /// Access the resource service.
    pub const fn resources(&self) -> &ResourceService {
        &self.resources
    }

    /// Access the rating service.
    pub const fn ratings(&self) -> &RatingService {
        &self.ratings
    }

    /// Access the catalog sync service.
    pub const fn sync(&self) -> &CatalogSyncService {
        &self.sync
    }
}
