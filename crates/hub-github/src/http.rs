//! HTTP backend abstraction for the GitHub API.
//!
//! The production implementation uses reqwest. It performs exactly one request
//! per call; retrying is left to the caller.

use crate::config::GithubClientConfig;
use crate::error::{GithubError, GithubResult, RateLimitHeaders, status_error};
use async_trait::async_trait;
use url::Url;

/// Header GitHub uses to report the remaining request quota.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Header GitHub sends with secondary rate limits.
pub const RETRY_AFTER: &str = "retry-after";

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that fetch response bodies.
///
/// Non-success statuses come back as errors already classified by
/// [`status_error`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and return the body of a successful response.
    async fn get(&self, url: &Url) -> GithubResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GithubClientConfig) -> GithubResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GithubError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            auth_token: config.token.clone(),
        })
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url.as_str())
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url) -> GithubResult<Vec<u8>> {
        tracing::debug!(url = %url, "GitHub request");
        let response = self.build_request(url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
        };
        let headers = RateLimitHeaders {
            remaining: header(RATE_LIMIT_REMAINING),
            retry_after: header(RETRY_AFTER),
        };
        tracing::debug!(
            status = status.as_u16(),
            remaining = ?headers.remaining,
            retry_after = ?headers.retry_after,
            "GitHub request refused"
        );
        Err(status_error(status.as_u16(), &headers, url.as_str()))
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
