//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_rating_repository;
mod sqlite_resource_repository;

pub use sqlite_rating_repository::SqliteRatingRepository;
pub use sqlite_resource_repository::SqliteResourceRepository;
