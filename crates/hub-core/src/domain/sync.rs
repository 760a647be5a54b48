//! Catalog sync result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable error category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The addressed entity or remote path does not exist.
    NotFound,
    /// The remote throttled the request.
    RateLimited,
    /// Transient network failure talking to the remote.
    TransientNetwork,
    /// Input or extracted metadata is malformed.
    Validation,
    /// Optimistic-concurrency or uniqueness conflict.
    Conflict,
    /// Persistence-layer failure.
    Store,
    /// Unexpected condition.
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::TransientNetwork => "transient_network",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Store => "store",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory that could not be reconciled during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub directory: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Counts produced by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// New resources written to the catalog.
    pub inserted: usize,
    /// Existing resources whose content changed.
    pub updated: usize,
    /// Existing resources whose content was unchanged.
    pub skipped: usize,
    /// Directories that failed and were skipped.
    pub failed: usize,
    /// Directories without a definition file.
    pub not_resources: usize,
    /// Whether the pass stopped early on cancellation.
    pub cancelled: bool,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Total number of directories that were processed to completion.
    pub const fn processed(&self) -> usize {
        self.inserted + self.updated + self.skipped + self.failed + self.not_resources
    }

    pub(crate) fn record_failure(
        &mut self,
        directory: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) {
        self.failed += 1;
        self.failures.push(SyncFailure {
            directory: directory.into(),
            kind,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::TransientNetwork).unwrap();
        assert_eq!(json, "\"transient_network\"");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }

    #[test]
    fn test_record_failure_counts() {
        let mut report = SyncReport {
            inserted: 2,
            skipped: 1,
            ..SyncReport::default()
        };
        report.record_failure("broken", ErrorKind::Validation, "bad yaml");

        assert_eq!(report.failed, 1);
        assert_eq!(report.processed(), 4);
        assert_eq!(report.failures[0].directory, "broken");
    }
}
