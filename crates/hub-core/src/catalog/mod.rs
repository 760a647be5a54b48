//! Catalog discovery building blocks.
//!
//! - `candidates` - which top-level directories of a remote tree to look at
//! - `extract` - turning one directory into a normalized resource record
//! - `retry` - capped exponential backoff around remote reads
//!
//! The orchestration lives in `services::CatalogSyncService`.

mod candidates;
mod extract;
mod retry;

pub use candidates::select_candidates;
pub use extract::{
    CATEGORIES_ANNOTATION, DefinitionMetadata, ExtractError, ExtractedResource, Extraction,
    MetadataExtractor, ResourceFiles, TAGS_ANNOTATION, classify_files, content_fingerprint,
    extract_description, parse_definition,
};
pub use retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS, RetryPolicy};
