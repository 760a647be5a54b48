//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the pipeline task hub.
///
/// Global options fall back to environment variables, which may also come
/// from a `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "hub")]
#[command(about = "Synchronize, browse and rate a catalog of pipeline tasks")]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the SQLite database (defaults to the platform data directory)
    #[arg(long = "database", env = "HUB_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// GitHub API base URL, for GitHub Enterprise installations
    #[arg(long = "github-api", env = "HUB_GITHUB_API", global = true)]
    pub github_api: Option<String>,

    /// GitHub access token used for catalog reads
    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        global = true,
        hide_env_values = true
    )]
    pub github_token: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "hub",
            "--verbose",
            "--database",
            "/tmp/hub.db",
            "--github-api",
            "https://github.example.com/api/v3",
            "tags",
        ]);
        assert!(cli.verbose);
        assert!(!cli.json);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/hub.db")));
        assert_eq!(
            cli.github_api.as_deref(),
            Some("https://github.example.com/api/v3")
        );
        assert!(matches!(cli.command, Commands::Tags));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["hub"]).is_err());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["hub", "list", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
    }
}
