//! Public configuration for the GitHub client.

use std::time::Duration;

/// Default GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Configuration for the GitHub client.
///
/// # Example
///
/// ```
/// use hub_github::GithubClientConfig;
/// use std::time::Duration;
///
/// let config = GithubClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-hub/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// API root, e.g. `https://api.github.com` or a GitHub Enterprise `/api/v3`
    pub(crate) base_url: String,
    /// GitHub rejects requests without a user agent
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    /// Personal access token, sent as a bearer token
    pub(crate) token: Option<String>,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            user_agent: concat!("hub-github/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl GithubClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    ///
    /// Defaults to `https://api.github.com`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an access token. Unauthenticated clients get a much lower rate limit.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional access token. Empty tokens are treated as absent.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}
