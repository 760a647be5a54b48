//! CLI configuration resolved from flags, environment and defaults.

use std::path::PathBuf;

use hub_core::CatalogSettings;
use hub_github::GithubClientConfig;

use crate::commands::{Commands, SyncArgs};
use crate::error::CliError;
use crate::parser::Cli;

/// Database location under the platform data directory.
const DATA_SUBDIR: &str = "hub";
const DATABASE_FILE: &str = "hub.db";

/// Default database path: `<data dir>/hub/hub.db`.
pub fn default_database_path() -> Result<PathBuf, CliError> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        CliError::Config("cannot determine the platform data directory; pass --database".into())
    })?;
    Ok(data_dir.join(DATA_SUBDIR).join(DATABASE_FILE))
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database_path: PathBuf,
    pub github: GithubClientConfig,
    pub catalog: CatalogSettings,
}

impl CliConfig {
    /// Resolve configuration for a parsed command line.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let database_path = match cli.database {
            Some(ref path) => path.clone(),
            None => default_database_path()?,
        };

        let mut github = GithubClientConfig::new()
            .with_user_agent(concat!("hub-cli/", env!("CARGO_PKG_VERSION")))
            .with_optional_token(cli.github_token.clone());
        if let Some(ref base_url) = cli.github_api {
            github = github.with_base_url(base_url.clone());
        }

        let mut catalog = CatalogSettings::default();
        if let Commands::Sync(ref args) = cli.command {
            apply_sync_overrides(&mut catalog, args);
        }

        Ok(Self {
            database_path,
            github,
            catalog,
        })
    }
}

/// Apply per-invocation sync flags. Values are validated when the pass starts.
fn apply_sync_overrides(catalog: &mut CatalogSettings, args: &SyncArgs) {
    if let Some(concurrency) = args.concurrency {
        catalog.concurrency = concurrency;
    }
    if let Some(max_attempts) = args.max_attempts {
        catalog.retry.max_attempts = max_attempts;
    }
    for dir in &args.exclude {
        if !catalog.excluded_dirs.contains(dir) {
            catalog.excluded_dirs.push(dir.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_database_path() {
        let cli = Cli::parse_from(["hub", "--database", "/tmp/custom.db", "tags"]);
        let config = CliConfig::from_cli(&cli).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.catalog, CatalogSettings::default());
    }

    #[test]
    fn test_default_database_path_layout() {
        if let Ok(path) = default_database_path() {
            assert!(path.ends_with("hub/hub.db"));
        }
    }

    #[test]
    fn test_sync_overrides() {
        let cli = Cli::parse_from([
            "hub",
            "--database",
            "/tmp/hub.db",
            "sync",
            "tektoncd",
            "catalog",
            "--concurrency",
            "8",
            "--max-attempts",
            "2",
            "--exclude",
            "experimental",
            "--exclude",
            "vendor",
        ]);
        let config = CliConfig::from_cli(&cli).unwrap();

        assert_eq!(config.catalog.concurrency, 8);
        assert_eq!(config.catalog.retry.max_attempts, 2);
        assert!(config.catalog.is_excluded("experimental"));
        assert_eq!(
            config
                .catalog
                .excluded_dirs
                .iter()
                .filter(|d| *d == "vendor")
                .count(),
            1
        );
    }
}
