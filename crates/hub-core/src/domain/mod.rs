//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, remote hosting API, etc.).
//!
//! # Structure
//!
//! - `resource` - Catalog resource types (`Resource`, `NewResource`, filters)
//! - `rating` - Per-user ratings and aggregates
//! - `sync` - Reconciliation pass results and error categories

mod rating;
mod resource;
mod sync;

pub use rating::{MAX_STARS, MIN_STARS, Rating, RatingSummary, is_valid_stars};
pub use resource::{
    CategoryTags, GithubDetails, NewResource, RAW_CONTENT_HOST, RawLinks, Resource,
    ResourceContentUpdate, ResourceFilter, ResourceKind, ResourceSubmission, normalize_names,
};
pub use sync::{ErrorKind, SyncFailure, SyncReport};
