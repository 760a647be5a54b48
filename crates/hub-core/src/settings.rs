//! Catalog sync settings and validation.
//!
//! These are pure domain types with no infrastructure dependencies. Adapters
//! build them from flags, environment or files and hand them to the core.

use serde::{Deserialize, Serialize};

use crate::catalog::RetryPolicy;

/// Top-level directories that never hold catalog resources.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["vendor", "test", "tests", ".github", "hack", "docs"];

/// Upper bound on an extracted description, in characters.
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 4096;

/// Number of catalog directories reconciled concurrently.
pub const DEFAULT_SYNC_CONCURRENCY: usize = 4;

/// Settings for catalog synchronization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogSettings {
    /// Top-level directory names skipped by the walk. Hidden directories
    /// (leading `.`) are always skipped.
    pub excluded_dirs: Vec<String>,

    /// Maximum description length kept from a README.
    pub max_description_len: usize,

    /// Directories reconciled at the same time (1-64).
    pub concurrency: usize,

    /// Backoff for rate-limited and transient remote failures.
    pub retry: RetryPolicy,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
            concurrency: DEFAULT_SYNC_CONCURRENCY,
            retry: RetryPolicy::default(),
        }
    }
}

impl CatalogSettings {
    /// Whether a top-level directory is excluded from the walk.
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded_dirs.iter().any(|dir| dir == name)
    }

    /// Validate settings values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=64).contains(&self.concurrency) {
            return Err(SettingsError::InvalidConcurrency(self.concurrency));
        }
        if self.max_description_len == 0 {
            return Err(SettingsError::InvalidDescriptionLimit);
        }
        if !(1..=10).contains(&self.retry.max_attempts) {
            return Err(SettingsError::InvalidRetryAttempts(self.retry.max_attempts));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(SettingsError::InvalidRetryDelay {
                base_ms: self.retry.base_delay_ms,
                max_ms: self.retry.max_delay_ms,
            });
        }
        Ok(())
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Sync concurrency must be between 1 and 64, got {0}")]
    InvalidConcurrency(usize),

    #[error("Maximum description length must be positive")]
    InvalidDescriptionLimit,

    #[error("Retry attempts must be between 1 and 10, got {0}")]
    InvalidRetryAttempts(u32),

    #[error("Retry base delay ({base_ms}ms) exceeds the maximum delay ({max_ms}ms)")]
    InvalidRetryDelay { base_ms: u64, max_ms: u64 },
}
