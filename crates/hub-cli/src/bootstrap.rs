//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Database pool and repositories (via hub-db)
//! - GitHub reader (via hub-github)
//! - Core services (via hub-core)
//!
//! Command handlers receive the composed `HubCore` and delegate work to it.

use std::sync::Arc;

use anyhow::{Context, Result};
use hub_core::{CatalogSettings, HubCore, RemoteRepositoryReader, Repos};
use hub_db::{CoreFactory, setup_database};
use hub_github::DefaultGithubClient;
use tokio_util::sync::CancellationToken;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::presentation::OutputFormat;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub core: HubCore,
    /// Cancelled on Ctrl-C; long-running commands stop at the next checkpoint.
    pub cancel: CancellationToken,
    pub output: OutputFormat,
}

impl CliContext {
    /// Access the `HubCore`.
    pub const fn core(&self) -> &HubCore {
        &self.core
    }
}

/// Bootstrap the CLI application.
///
/// Creates the database (and its parent directory) if missing, builds the
/// GitHub reader and assembles the `HubCore`.
pub async fn bootstrap(
    config: CliConfig,
    output: OutputFormat,
    cancel: CancellationToken,
) -> Result<CliContext> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(CliError::from)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let pool = setup_database(&config.database_path)
        .await
        .map_err(|e| CliError::Database(format!("{e:#}")))?;
    tracing::debug!(path = %config.database_path.display(), "Database ready");

    let reader: Arc<dyn RemoteRepositoryReader> = Arc::new(
        DefaultGithubClient::new(&config.github).map_err(|e| CliError::Config(e.to_string()))?,
    );

    let core = CoreFactory::build_hub_core(pool, reader, config.catalog);
    Ok(CliContext {
        core,
        cancel,
        output,
    })
}

/// Bootstrap with injected repositories and reader (for testing).
pub fn bootstrap_with(
    repos: Repos,
    reader: Arc<dyn RemoteRepositoryReader>,
    catalog: CatalogSettings,
    output: OutputFormat,
) -> CliContext {
    CliContext {
        core: HubCore::new(repos, reader, catalog),
        cancel: CancellationToken::new(),
        output,
    }
}
