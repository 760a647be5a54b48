//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They don't know about concrete implementations.

mod app_core;
mod catalog_sync;
mod rating_service;
mod resource_service;

pub use app_core::HubCore;
pub use catalog_sync::{CatalogSyncService, DirectoryOutcome, SyncError};
pub use rating_service::RatingService;
pub use resource_service::ResourceService;
