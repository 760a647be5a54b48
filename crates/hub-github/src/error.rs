//! Internal error types for GitHub operations.
//!
//! These errors are internal to `hub-github` and are mapped to the core
//! `RemoteError` at the port boundary.

use thiserror::Error;

/// Result type alias for GitHub operations.
pub type GithubResult<T> = Result<T, GithubError>;

/// Errors related to GitHub API operations.
#[derive(Debug, Error)]
pub enum GithubError {
    /// API request failed with an HTTP error status.
    #[error("GitHub API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The API refused the request because the rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {url}")]
    RateLimitExceeded { url: String },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from GitHub API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The client could not be configured.
    #[error("Invalid client configuration: {message}")]
    InvalidConfig { message: String },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// File content was not valid base64.
    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded file content was not UTF-8.
    #[error("File content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Rate-limit headers of a refused response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitHeaders<'a> {
    /// `x-ratelimit-remaining`
    pub remaining: Option<&'a str>,
    /// `retry-after`
    pub retry_after: Option<&'a str>,
}

impl RateLimitHeaders<'_> {
    fn quota_exhausted(&self) -> bool {
        self.remaining.is_some_and(|remaining| remaining.trim() == "0")
    }
}

/// Classify a non-success HTTP status.
///
/// GitHub signals an exhausted primary rate limit with 403 and
/// `x-ratelimit-remaining: 0`. Secondary limits come back as 429, or as 403
/// with a `retry-after` header while quota is still left.
pub fn status_error(status: u16, headers: &RateLimitHeaders<'_>, url: &str) -> GithubError {
    let limited = headers.quota_exhausted() || headers.retry_after.is_some();
    if status == 429 || (status == 403 && limited) {
        GithubError::RateLimitExceeded {
            url: url.to_string(),
        }
    } else {
        GithubError::ApiRequestFailed {
            status,
            url: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.github.com/repos/tektoncd/catalog/contents";

    #[test]
    fn test_api_request_failed_error_message() {
        let error = GithubError::ApiRequestFailed {
            status: 404,
            url: URL.to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("api.github.com"));
    }

    fn remaining(value: &str) -> RateLimitHeaders<'_> {
        RateLimitHeaders {
            remaining: Some(value),
            retry_after: None,
        }
    }

    #[test]
    fn test_status_error_rate_limits() {
        assert!(matches!(
            status_error(429, &RateLimitHeaders::default(), URL),
            GithubError::RateLimitExceeded { .. }
        ));
        assert!(matches!(
            status_error(403, &remaining("0"), URL),
            GithubError::RateLimitExceeded { .. }
        ));
    }

    #[test]
    fn test_status_error_secondary_limit_with_retry_after() {
        let headers = RateLimitHeaders {
            remaining: Some("4321"),
            retry_after: Some("60"),
        };
        assert!(matches!(
            status_error(403, &headers, URL),
            GithubError::RateLimitExceeded { .. }
        ));
    }

    #[test]
    fn test_status_error_forbidden_with_quota_left() {
        assert!(matches!(
            status_error(403, &remaining("4999"), URL),
            GithubError::ApiRequestFailed { status: 403, .. }
        ));
        assert!(matches!(
            status_error(403, &RateLimitHeaders::default(), URL),
            GithubError::ApiRequestFailed { status: 403, .. }
        ));
    }

    #[test]
    fn test_status_error_passes_other_statuses_through() {
        assert!(matches!(
            status_error(502, &RateLimitHeaders::default(), URL),
            GithubError::ApiRequestFailed { status: 502, .. }
        ));
        assert!(matches!(
            status_error(404, &remaining("0"), URL),
            GithubError::ApiRequestFailed { status: 404, .. }
        ));
    }
}
