//! Main commands enum and subcommands.

use clap::{Args, Subcommand};
use hub_core::ResourceKind;

/// Available commands for the hub CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize resources from a catalog repository
    Sync(SyncArgs),

    /// List catalog resources
    List {
        /// Only resources of this kind (task or pipeline)
        #[arg(short, long)]
        kind: Option<ResourceKind>,
        /// Only resources carrying any of these tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Only verified (catalog-synced) or only user-submitted resources
        #[arg(long)]
        verified: Option<bool>,
        /// Only resources submitted by this user
        #[arg(long, conflicts_with_all = ["kind", "tags", "verified"])]
        user: Option<i64>,
    },

    /// Show a single resource
    Show {
        /// Resource ID
        id: i64,
        /// Also fetch and print the README from the catalog repository
        #[arg(long)]
        readme: bool,
    },

    /// Delete a resource with its labels, ratings and GitHub details
    Delete {
        /// Resource ID
        id: i64,
    },

    /// List all tags in use
    Tags,

    /// List categories with the tags of their resources
    Categories,

    /// Print raw content links for a resource's files
    Links {
        /// Resource ID
        id: i64,
    },

    /// Print a resource's definition and count the download
    Download {
        /// Resource ID
        id: i64,
    },

    /// Submit a user resource
    Submit(SubmitArgs),

    /// Rate resources and read rating aggregates
    Rate {
        #[command(subcommand)]
        command: RateCommand,
    },
}

/// Arguments for `hub sync`.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repository: String,
    /// Branch, tag or commit to read
    #[arg(long = "ref", default_value = "main")]
    pub git_ref: String,
    /// Directories reconciled concurrently
    #[arg(short, long)]
    pub concurrency: Option<usize>,
    /// Additional top-level directories to skip (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
    /// Attempts per remote call before a directory is reported failed
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Arguments for `hub submit`.
#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Submitting user
    #[arg(long)]
    pub user: i64,
    /// Resource name
    #[arg(long)]
    pub name: String,
    /// Resource kind
    #[arg(long, default_value = "task")]
    pub kind: ResourceKind,
    /// Repository owner
    #[arg(long)]
    pub owner: String,
    /// Repository name
    #[arg(long)]
    pub repository: String,
    /// Branch, tag or commit
    #[arg(long = "ref", default_value = "main")]
    pub git_ref: String,
    /// Path of the YAML definition inside the repository
    #[arg(long)]
    pub path: String,
    /// Path of the README inside the repository
    #[arg(long)]
    pub readme_path: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Categories (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
}

/// Rating subcommands.
#[derive(Subcommand, Debug)]
pub enum RateCommand {
    /// Record a user's first rating of a resource
    Add {
        user: i64,
        resource: i64,
        /// Stars, 1 to 5
        stars: u8,
    },

    /// Change a rating, failing if it is no longer the expected value
    Update {
        user: i64,
        resource: i64,
        /// New stars, 1 to 5
        stars: u8,
        /// The rating the caller last saw
        #[arg(long)]
        previous: u8,
    },

    /// Show a user's rating of a resource
    Get { user: i64, resource: i64 },

    /// Show a resource's average rating and rating count
    Summary { resource: i64 },
}
