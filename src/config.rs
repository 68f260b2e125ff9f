// ABOUTME: Client configuration - API key, base URL, timeout, and retry policy.
// ABOUTME: Built once via ClientConfig::builder() and never mutated afterwards.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{DatagenError, Result};
use crate::retry::RetryPolicy;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "DATAGEN_API_KEY";

/// Canonical production gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.datagen.dev";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Unit delay for exponential backoff.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// A source of named configuration values.
///
/// The client only ever needs to read one string by name, so tests can swap
/// in a [`MapSource`] instead of touching the process environment.
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads values from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory configuration source.
#[derive(Debug, Clone, Default)]
pub struct MapSource(HashMap<String, String>);

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl ConfigSource for MapSource {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Full URL of the tool execution endpoint.
    pub fn execute_url(&self) -> String {
        format!("{}/api/tools/execute", self.base_url)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff_base: Duration,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: 0,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Set the API key explicitly. Takes precedence over the environment.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of retries after the first attempt. Zero means one attempt total.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Build using the process environment as the fallback key source.
    pub fn build(self) -> Result<ClientConfig> {
        self.build_with(&EnvSource)
    }

    /// Build, falling back to `source` when no API key was set explicitly.
    pub fn build_with(self, source: &dyn ConfigSource) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| source.get(API_KEY_ENV).filter(|k| !k.is_empty()))
            .ok_or(DatagenError::AuthConfiguration(API_KEY_ENV))?;

        if self.timeout.is_zero() {
            return Err(DatagenError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let base_url = self.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| {
            DatagenError::InvalidConfig(format!("invalid base_url '{}': {}", base_url, e))
        })?;

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout: self.timeout,
            retry: RetryPolicy::new(self.max_retries, self.backoff_base),
        })
    }
}
