// src/config/mod.rs
// Client configuration: defaults, then ~/.emno/config.toml, then environment

pub mod env;
pub mod file;

pub use env::EnvOverrides;
pub use file::FileConfig;

use crate::error::{EmnoError, Result};
use crate::transport::RetryPolicy;
use std::time::Duration;
use tracing::debug;

/// Public endpoint of the hosted service
pub const DEFAULT_BASE_URL: &str = "https://apis.emno.io";

/// Value of the `Client` header sent with every request
pub const CLIENT_ID: &str = "sdk-rust";

/// Default whole-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable settings shared by the facade and every handle it creates
#[derive(Debug, Clone, PartialEq)]
pub struct EmnoConfig {
    pub base_url: String,
    pub token: String,
    /// Raise service errors instead of logging them and returning `None`
    pub should_throw: bool,
    /// Log swallowed service errors (only relevant when not throwing)
    pub log_errors: bool,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl EmnoConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            should_throw: false,
            log_errors: true,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_should_throw(mut self, should_throw: bool) -> Self {
        self.should_throw = should_throw;
        self
    }

    pub fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    /// Build a config from `~/.emno/config.toml` overlaid with `EMNO_*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        Self::resolve(FileConfig::load(), EnvOverrides::from_env())
    }

    /// Layer file values, then environment values, over the defaults
    pub fn resolve(file: FileConfig, env: EnvOverrides) -> Result<Self> {
        let token = env
            .token
            .or(file.client.token)
            .ok_or_else(|| EmnoError::Config("no token configured (set EMNO_TOKEN)".into()))?;

        let mut config = Self::new(token);
        if let Some(base_url) = env.base_url.or(file.client.base_url) {
            config.base_url = base_url;
        }
        if let Some(should_throw) = env.should_throw.or(file.client.should_throw) {
            config.should_throw = should_throw;
        }
        if let Some(log_errors) = env.log_errors.or(file.client.log_errors) {
            config.log_errors = log_errors;
        }
        if let Some(max_retries) = env.max_retries.or(file.retry.max_retries) {
            config.retry.max_retries = max_retries;
        }
        if let Some(ms) = file.retry.base_delay_ms {
            config.retry.base_delay = Duration::from_millis(ms);
        }

        config.validate()?;
        debug!(base_url = %config.base_url, should_throw = config.should_throw, "Resolved client config");
        Ok(config)
    }

    /// Reject configs that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(EmnoError::Config("token must not be empty".into()));
        }
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| EmnoError::Config(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EmnoError::Config(format!(
                "base URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub(crate) fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
