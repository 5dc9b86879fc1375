//! SDK configuration
//!
//! An immutable configuration struct passed at client construction. There
//! are no process-wide mutable defaults; everything a request needs is
//! derived from the config captured by the client.

use crate::error::ChutesError;
use crate::policy::RequestPolicy;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.chutes.ai";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "CHUTES_API_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "CHUTES_API_BASE_URL";

/// Values that are clearly copied from documentation rather than real keys.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your-api-key",
    "your_api_key",
    "api-key-here",
    "changeme",
    "placeholder",
];

/// Configuration for the Chutes API client.
#[derive(Debug, Clone)]
pub struct ChutesConfig {
    /// Bearer token passed through opaquely on every request.
    pub api_key: String,
    /// Primary API base URL.
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay: Duration,
    /// Alternate base URLs tried when the primary is failing.
    pub fallback_endpoints: Vec<String>,
    /// Extra headers added to every request.
    pub custom_headers: Vec<(String, String)>,
    /// Emit request/response bodies at debug level.
    pub enable_logging: bool,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ChutesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            fallback_endpoints: Vec::new(),
            custom_headers: Vec::new(),
            enable_logging: false,
            user_agent: format!("chutes-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ChutesConfig {
    /// Create a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Build a configuration from `CHUTES_API_KEY` and, when set,
    /// `CHUTES_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ChutesError> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| ChutesError::Configuration(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the fallback base URLs.
    pub fn with_fallback_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.fallback_endpoints = endpoints;
        self
    }

    /// Add a header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Enable request/response body logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ChutesError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ChutesError::Configuration(
                "API key cannot be empty".to_string(),
            ));
        }
        if key.len() < 8 {
            return Err(ChutesError::Configuration(
                "API key looks truncated (minimum 8 characters)".to_string(),
            ));
        }
        let lowered = key.to_ascii_lowercase();
        if PLACEHOLDER_KEYS.contains(&lowered.as_str()) {
            return Err(ChutesError::Configuration(
                "API key is a placeholder value".to_string(),
            ));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            ChutesError::Configuration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        for endpoint in &self.fallback_endpoints {
            url::Url::parse(endpoint).map_err(|e| {
                ChutesError::Configuration(format!("invalid fallback endpoint {endpoint:?}: {e}"))
            })?;
        }

        if self.timeout.is_zero() {
            return Err(ChutesError::Configuration(
                "timeout cannot be zero".to_string(),
            ));
        }
        if self.retry_base_delay.is_zero() {
            return Err(ChutesError::Configuration(
                "retry base delay cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Derive the request policy used for calls issued with this config.
    pub fn request_policy(&self) -> RequestPolicy {
        RequestPolicy::new()
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries)
            .with_retry_base_delay(self.retry_base_delay)
            .with_fallback_base_urls(self.fallback_endpoints.clone())
    }
}
