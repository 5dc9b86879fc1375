//! SDK error types and handling
//!
//! Every failure the SDK can surface is classified exactly once, at the
//! point it is constructed. Downstream code branches on the variant (and
//! `status()`), never on message text.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum ChutesError {
    /// An operation exceeded its deadline
    #[error("operation {label} timed out after {timeout_ms}ms")]
    Timeout {
        label: String,
        timeout_ms: u64,
    },

    /// The API returned a non-success status, or a decoded payload failed
    /// shape validation (`status: None` in that case)
    #[error("API error: {message}")]
    Response {
        status: Option<u16>,
        message: String,
        details: Option<Value>,
    },

    /// Transport-level failure (DNS, connection, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// The in-flight operation was cancelled
    #[error("operation {label} was aborted")]
    Aborted { label: String },

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Decoding a successful response body failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for failures with no better classification
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, ChutesError>;

impl ChutesError {
    /// Build a [`ChutesError::Timeout`] for the given operation label.
    pub fn timeout(label: impl Into<String>, timeout: Duration) -> Self {
        ChutesError::Timeout {
            label: label.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Build a [`ChutesError::Response`] carrying an HTTP status and the
    /// decoded error body, if one could be decoded.
    pub fn response(status: u16, message: impl Into<String>, details: Option<Value>) -> Self {
        ChutesError::Response {
            status: Some(status),
            message: message.into(),
            details,
        }
    }

    /// Build a [`ChutesError::Response`] for a payload that failed shape
    /// validation. Carries no HTTP status.
    pub fn shape(message: impl Into<String>) -> Self {
        ChutesError::Response {
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Build a [`ChutesError::Aborted`] for the given operation label.
    pub fn aborted(label: impl Into<String>) -> Self {
        ChutesError::Aborted {
            label: label.into(),
        }
    }

    /// Whether the retry engine may re-attempt after this failure.
    ///
    /// Network failures, timeouts, and responses with status 404/408/429/5xx
    /// are recoverable by retrying (possibly against a fallback endpoint).
    /// Other client errors are terminal: re-sending a malformed request
    /// cannot succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChutesError::Network(_) | ChutesError::Timeout { .. } => true,
            ChutesError::Response {
                status: Some(status),
                ..
            } => matches!(*status, 404 | 408 | 429) || *status >= 500,
            _ => false,
        }
    }

    /// Get the HTTP status code if this failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChutesError::Response { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this failure indicates bad or missing credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeout_message() {
        let error = ChutesError::timeout("attempt 2", Duration::from_millis(1500));
        assert_eq!(error.to_string(), "operation attempt 2 timed out after 1500ms");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ChutesError::Network("connection refused".to_string()).is_retryable());
        assert!(ChutesError::timeout("attempt 0", Duration::from_secs(10)).is_retryable());
        assert!(ChutesError::response(503, "HTTP Error 503", None).is_retryable());
        assert!(ChutesError::response(429, "HTTP Error 429", None).is_retryable());
        assert!(ChutesError::response(408, "HTTP Error 408", None).is_retryable());
        assert!(ChutesError::response(404, "HTTP Error 404", None).is_retryable());

        assert!(!ChutesError::response(400, "HTTP Error 400", None).is_retryable());
        assert!(!ChutesError::response(401, "HTTP Error 401", None).is_retryable());
        assert!(!ChutesError::response(422, "HTTP Error 422", None).is_retryable());
        assert!(!ChutesError::aborted("attempt 0").is_retryable());
        assert!(!ChutesError::shape("missing field").is_retryable());
        assert!(!ChutesError::Configuration("bad key".to_string()).is_retryable());
    }

    #[test]
    fn test_status_extraction() {
        let error = ChutesError::response(404, "not found", Some(json!({"detail": "nope"})));
        assert_eq!(error.status(), Some(404));
        assert_eq!(ChutesError::shape("bad payload").status(), None);
        assert_eq!(ChutesError::Network("dns".to_string()).status(), None);
    }

    #[test]
    fn test_auth_classification() {
        assert!(ChutesError::response(401, "HTTP Error 401", None).is_auth_error());
        assert!(ChutesError::response(403, "HTTP Error 403", None).is_auth_error());
        assert!(!ChutesError::response(500, "HTTP Error 500", None).is_auth_error());
        assert!(!ChutesError::Network("dns".to_string()).is_auth_error());
    }
}
