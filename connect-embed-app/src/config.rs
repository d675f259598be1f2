//! TOML configuration for the embedded Connect bootstrap.
//!
//! ```toml
//! publishable_key = "pk_test_123"
//!
//! [secret_endpoint]
//! url = "https://api.example.com/account_session"
//! timeout_ms = 10000
//!
//! [acquisition.retry]
//! max_attempts = 3
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use connect_embed_core::error::{CoreError, CoreResult};
use connect_embed_core::services::ProviderOptions;
use connect_embed_core::types::{AppearanceConfig, RetryPolicy};

/// Environment variable overriding `publishable_key`
pub const ENV_PUBLISHABLE_KEY: &str = "CONNECT_EMBED_PUBLISHABLE_KEY";
/// Environment variable overriding `secret_endpoint.url`
pub const ENV_SECRET_ENDPOINT: &str = "CONNECT_EMBED_SECRET_ENDPOINT";

const DEFAULT_ENDPOINT_TIMEOUT_MS: u64 = 10_000;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbedConfig {
    /// Vendor publishable key (`pk_...`)
    pub publishable_key: String,
    /// Account-session endpoint returning the client secret
    pub secret_endpoint: SecretEndpointConfig,
    /// Timeout and retry of the acquisition
    pub acquisition: AcquisitionConfig,
    /// Palette overrides and default scheme
    pub appearance: AppearanceConfig,
}

/// Account-session endpoint
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecretEndpointConfig {
    pub url: String,
    /// Sent as `Authorization: Bearer ...` when present
    pub bearer_token: Option<String>,
    /// Connected account the session is created for, sent in the request body
    pub account: Option<String>,
    /// HTTP client timeout
    pub timeout_ms: u64,
}

impl Default for SecretEndpointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            bearer_token: None,
            account: None,
            timeout_ms: DEFAULT_ENDPOINT_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for SecretEndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretEndpointConfig")
            .field("url", &self.url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "***"))
            .field("account", &self.account)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Acquisition tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Per-attempt limit; unset means no limit
    pub attempt_timeout_ms: Option<u64>,
    pub retry: RetryPolicy,
}

impl EmbedConfig {
    /// Parse a TOML document. Does not validate.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        toml::from_str(s).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Apply `CONNECT_EMBED_*` environment overrides
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_PUBLISHABLE_KEY).filter(|v| !v.trim().is_empty()) {
            self.publishable_key = key;
        }
        if let Some(url) = lookup(ENV_SECRET_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.secret_endpoint.url = url;
        }
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !self.publishable_key.starts_with("pk_") {
            return Err(CoreError::ValidationError(
                "publishable_key must start with \"pk_\"".to_string(),
            ));
        }

        let url = url::Url::parse(&self.secret_endpoint.url).map_err(|e| {
            CoreError::ValidationError(format!(
                "secret_endpoint.url is not a valid URL ({}): {e}",
                self.secret_endpoint.url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::ValidationError(format!(
                "secret_endpoint.url must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.secret_endpoint.timeout_ms == 0 {
            return Err(CoreError::ValidationError(
                "secret_endpoint.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.acquisition.attempt_timeout_ms == Some(0) {
            return Err(CoreError::ValidationError(
                "acquisition.attempt_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Options for `AsyncInstanceProvider`
    #[must_use]
    pub fn provider_options(&self) -> ProviderOptions {
        let mut options = ProviderOptions::new(self.publishable_key.clone())
            .with_retry(self.acquisition.retry)
            .with_appearance(self.appearance.clone());
        if let Some(ms) = self.acquisition.attempt_timeout_ms {
            options = options.with_attempt_timeout(Duration::from_millis(ms));
        }
        options
    }
}
