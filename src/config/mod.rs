//! Configuration for talking to the automation platform.
//!
//! # Overview
//!
//! - [`ProviderConfig`]: endpoint, credentials and transport settings
//! - [`ProviderConfigBuilder`]: builds a [`ProviderConfig`], failing fast on
//!   missing required fields
//! - [`ApiUrl`]: a validated `http`/`https` base URL
//! - [`AccessToken`]: a non-empty bearer token with masked debug output
//! - [`ApiVersion`]: a `YYYY-MM-DD` platform API version
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use automation_provider::{AccessToken, ApiUrl, ApiVersion, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .api_url(ApiUrl::new("https://automation.example.com/api").unwrap())
//!     .access_token(AccessToken::new("tok-123").unwrap())
//!     .api_version(ApiVersion::new("2024-03-01").unwrap())
//!     .request_timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.request_timeout(), Duration::from_secs(10));
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{AccessToken, ApiUrl, ApiVersion};

use crate::error::ConfigError;

/// Connection settings for the automation platform.
///
/// `ProviderConfig` is `Clone`, `Send`, and `Sync`; one instance can back
/// any number of clients.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    api_url: ApiUrl,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    insecure: bool,
    request_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl ProviderConfig {
    /// Default per-request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new builder for constructing a `ProviderConfig`.
    #[must_use]
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Returns the bearer token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the API version, if configured.
    #[must_use]
    pub const fn api_version(&self) -> Option<&ApiVersion> {
        self.api_version.as_ref()
    }

    /// Returns whether invalid TLS certificates are accepted.
    #[must_use]
    pub const fn insecure(&self) -> bool {
        self.insecure
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ProviderConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProviderConfig>();
};

/// Builder for [`ProviderConfig`].
///
/// `api_url` is required.
///
/// # Defaults
///
/// - `access_token`: `None` (no `Authorization` header)
/// - `api_version`: `None` (the platform's default)
/// - `insecure`: `false`
/// - `request_timeout`: [`ProviderConfig::DEFAULT_REQUEST_TIMEOUT`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
    api_url: Option<ApiUrl>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    insecure: Option<bool>,
    request_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ProviderConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn api_url(mut self, url: ApiUrl) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Sets the bearer token sent with every request.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version sent as the `apiVersion` query parameter.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Accepts invalid TLS certificates. Only for lab installations with
    /// self-signed certificates.
    #[must_use]
    pub const fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ProviderConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_url` is not set.
    pub fn build(self) -> Result<ProviderConfig, ConfigError> {
        let api_url = self
            .api_url
            .ok_or(ConfigError::MissingRequiredField { field: "api_url" })?;

        Ok(ProviderConfig {
            api_url,
            access_token: self.access_token,
            api_version: self.api_version,
            insecure: self.insecure.unwrap_or(false),
            request_timeout: self
                .request_timeout
                .unwrap_or(ProviderConfig::DEFAULT_REQUEST_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
