#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use catalog::{
    ExtractError, ExtractedResource, Extraction, MetadataExtractor, RetryPolicy, classify_files,
    content_fingerprint, extract_description, parse_definition, select_candidates,
};
pub use domain::{
    CategoryTags, ErrorKind, GithubDetails, MAX_STARS, MIN_STARS, NewResource, RawLinks, Rating,
    RatingSummary, Resource, ResourceContentUpdate, ResourceFilter, ResourceKind,
    ResourceSubmission, SyncFailure, SyncReport, normalize_names,
};
pub use ports::{
    CoreError, EntryKind, RatingRepository, RemoteEntry, RemoteError, RemoteRepositoryReader,
    RemoteResult, RepoCoordinates, Repos, RepositoryError, ResourceRepository,
};
pub use services::{
    CatalogSyncService, DirectoryOutcome, HubCore, RatingService, ResourceService, SyncError,
};
pub use settings::{
    CatalogSettings, DEFAULT_EXCLUDED_DIRS, DEFAULT_MAX_DESCRIPTION_LEN, DEFAULT_SYNC_CONCURRENCY,
    SettingsError,
};

#[cfg(test)]
use tokio_test as _;
