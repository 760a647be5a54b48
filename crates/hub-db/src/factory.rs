//! Composition utilities for building `HubCore` with `SQLite` backends.
//!
//! This module provides factory functions for wiring up the application
//! with `SQLite` repositories. It is focused purely on construction and
//! should not contain any domain logic.

use sqlx::SqlitePool;
use std::sync::Arc;

use hub_core::{CatalogSettings, HubCore, RemoteRepositoryReader, Repos};

use crate::repositories::{SqliteRatingRepository, SqliteResourceRepository};

/// Factory for creating repository instances with `SQLite` backends.
///
/// This struct provides composition utilities only, no domain logic.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    ///
    /// This is the recommended way for adapters to obtain repositories.
    /// Returns a `Repos` struct from `hub-core` containing trait-object-wrapped
    /// repositories.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteResourceRepository::new(pool.clone())),
            Arc::new(SqliteRatingRepository::new(pool)),
        )
    }

    /// Build a complete `HubCore` from a pool and a remote reader.
    ///
    /// Equivalent to:
    ///
    /// ```ignore
    /// let repos = CoreFactory::build_repos(pool);
    /// let core = HubCore::new(repos, reader, settings);
    /// ```
    pub fn build_hub_core(
        pool: SqlitePool,
        reader: Arc<dyn RemoteRepositoryReader>,
        settings: CatalogSettings,
    ) -> HubCore {
        HubCore::new(Self::build_repos(pool), reader, settings)
    }

    /// Create a resource repository from a pool.
    pub fn resource_repository(pool: SqlitePool) -> Arc<SqliteResourceRepository> {
        Arc::new(SqliteResourceRepository::new(pool))
    }

    /// Create a rating repository from a pool.
    pub fn rating_repository(pool: SqlitePool) -> Arc<SqliteRatingRepository> {
        Arc::new(SqliteRatingRepository::new(pool))
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema
/// already applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the connection pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Build repositories over this database.
    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    /// Build a `HubCore` over this database and the given reader.
    pub fn hub_core(
        &self,
        reader: Arc<dyn RemoteRepositoryReader>,
        settings: CatalogSettings,
    ) -> HubCore {
        CoreFactory::build_hub_core(self.pool.clone(), reader, settings)
    }
}
