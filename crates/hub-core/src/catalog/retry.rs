//! Capped exponential backoff for remote reads.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::ports::{RemoteError, RemoteResult};

/// Default number of attempts (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;

/// Default upper bound for a single backoff delay.
pub const DEFAULT_MAX_DELAY_MS: u64 = 8_000;

/// Retry policy for remote calls.
///
/// Only errors for which [`RemoteError::is_retryable`] holds are retried.
/// The delay before retry `n` (1-based) is `base_delay_ms * 2^(n-1)`,
/// capped at `max_delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately, for tests and local readers.
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Backoff before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        let delay = self
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }

    /// Run `op` until it succeeds, fails terminally, or attempts run out.
    ///
    /// `operation` and `path` only label log events.
    pub async fn run<T, F, Fut>(&self, operation: &str, path: &str, mut op: F) -> RemoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        operation,
                        path,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying remote call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        tracing::warn!(operation, path, attempts, error = %err, "giving up on remote call");
                    }
                    return Err(err);
                }
            }
        }
    }
}
