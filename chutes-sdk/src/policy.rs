//! Per-request resilience policy
//!
//! A [`RequestPolicy`] is fixed before a request starts and never mutated
//! while it runs; per-attempt state (attempt index, effective target URL)
//! lives in the executor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether an HTTP status counts as success.
pub type StatusPredicate = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Resilience configuration for a single request (or a whole client).
#[derive(Clone)]
pub struct RequestPolicy {
    /// Deadline applied to each individual attempt.
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay: Duration,
    /// Extra headers merged into each attempt; these win over client defaults.
    pub headers: Vec<(String, String)>,
    /// Alternate base URLs rotated through on retries.
    pub fallback_base_urls: Vec<String>,
    /// Success predicate over the response status code.
    pub status_is_success: StatusPredicate,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            headers: Vec::new(),
            fallback_base_urls: Vec::new(),
            status_is_success: Arc::new(|status| (200..300).contains(&status)),
        }
    }
}

impl fmt::Debug for RequestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPolicy")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("headers", &self.headers)
            .field("fallback_base_urls", &self.fallback_base_urls)
            .field("status_is_success", &"<predicate>")
            .finish()
    }
}

impl RequestPolicy {
    /// Create a policy with default values.
    pub fn new() -> Self {
        Self::default()
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

    /// Add a header applied to every attempt.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the fallback base URLs rotated through on retries.
    pub fn with_fallback_base_urls(mut self, urls: Vec<String>) -> Self {
        self.fallback_base_urls = urls;
        self
    }

    /// Replace the success predicate.
    pub fn with_status_predicate(
        mut self,
        predicate: impl Fn(u16) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.status_is_success = Arc::new(predicate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RequestPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.retry_base_delay, Duration::from_secs(1));
        assert!(policy.fallback_base_urls.is_empty());
    }

    #[test]
    fn test_default_status_predicate() {
        let policy = RequestPolicy::default();
        assert!((policy.status_is_success)(200));
        assert!((policy.status_is_success)(204));
        assert!((policy.status_is_success)(299));
        assert!(!(policy.status_is_success)(199));
        assert!(!(policy.status_is_success)(301));
        assert!(!(policy.status_is_success)(404));
        assert!(!(policy.status_is_success)(500));
    }

    #[test]
    fn test_custom_status_predicate() {
        let policy = RequestPolicy::new().with_status_predicate(|status| status == 404);
        assert!((policy.status_is_success)(404));
        assert!(!(policy.status_is_success)(200));
    }

    #[test]
    fn test_builder_methods() {
        let policy = RequestPolicy::new()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1)
            .with_retry_base_delay(Duration::from_millis(250))
            .with_header("x-debug", "1")
            .with_fallback_base_urls(vec!["https://fallback.chutes.ai".to_string()]);

        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.retry_base_delay, Duration::from_millis(250));
        assert_eq!(policy.headers, vec![("x-debug".to_string(), "1".to_string())]);
        assert_eq!(policy.fallback_base_urls.len(), 1);
    }
}
