//! HTTP request executor
//!
//! This module provides the core HTTP client for the SDK: a single entry
//! point ([`HttpClient::fetch_with_retry`]) composing the timeout wrapper
//! and retry engine around a reqwest call, rotating across the primary and
//! fallback base URLs, validating status and content type, and stamping
//! metrics on every outcome.

use crate::config::ChutesConfig;
use crate::error::ChutesError;
use crate::observer::{RequestObserver, TracingObserver};
use crate::outcome::{Completed, RequestFailure, RequestMetrics, RequestResult};
use crate::policy::RequestPolicy;
use crate::retry::with_retry;
use futures::future::{AbortRegistration, Abortable, Aborted};
use reqwest::{header, Client, Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A response body decoded according to its declared content type.
///
/// The platform's API is not uniformly JSON; some error paths and legacy
/// endpoints answer with plain text, and deletes answer with no body at
/// all.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A structurally parsed `application/json` body.
    Json(Value),
    /// A body with any other content type, as raw text.
    Text(String),
    /// No body (204 or an empty response).
    Empty,
}

impl Payload {
    /// Interpret the payload as JSON, failing on plain text.
    pub fn into_json(self) -> Result<Value, ChutesError> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Empty => Ok(Value::Null),
            Payload::Text(text) => Err(ChutesError::shape(format!(
                "expected a JSON payload, got plain text: {text}"
            ))),
        }
    }

    /// Normalize the payload into a JSON value, wrapping text as a string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
            Payload::Empty => Value::Null,
        }
    }
}

/// The HTTP client for making API requests.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<ChutesConfig>,
    policy: RequestPolicy,
    observer: Arc<dyn RequestObserver>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ChutesConfig) -> Result<Self, ChutesError> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        for (name, value) in &config.custom_headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ChutesError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let policy = config.request_policy();
        Ok(Self {
            client,
            config: Arc::new(config),
            policy,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the request observer.
    pub fn with_observer(mut self, observer: impl RequestObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ChutesConfig {
        &self.config
    }

    /// Get the policy derived from the configuration.
    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// Make a GET request under the client's own policy.
    pub async fn get(&self, path: &str) -> Result<Payload, ChutesError> {
        self.fetch_with_retry(Method::GET, path, None, &self.policy)
            .await
            .map(|completed| completed.data)
            .map_err(RequestFailure::into_error)
    }

    /// Make a POST request under the client's own policy.
    pub async fn post(&self, path: &str, body: Value) -> Result<Payload, ChutesError> {
        self.fetch_with_retry(Method::POST, path, Some(body), &self.policy)
            .await
            .map(|completed| completed.data)
            .map_err(RequestFailure::into_error)
    }

    /// Make a DELETE request under the client's own policy.
    pub async fn delete(&self, path: &str) -> Result<Payload, ChutesError> {
        self.fetch_with_retry(Method::DELETE, path, None, &self.policy)
            .await
            .map(|completed| completed.data)
            .map_err(RequestFailure::into_error)
    }

    /// Execute a request with timeout, retry, and endpoint fallback.
    ///
    /// Attempt `n` targets `rotation[n % rotation.len()]` where the
    /// rotation list is `[base_url, ...policy.fallback_base_urls]`; attempt
    /// 0 therefore always targets the primary, and with no fallbacks every
    /// attempt does.
    pub async fn fetch_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        policy: &RequestPolicy,
    ) -> RequestResult<Payload> {
        let started = Instant::now();
        let rotation = self.rotation(policy);
        let primary_url = join_url(&rotation[0], path);

        self.observer.on_request_start(method.as_str(), &primary_url);

        let mut last_attempt: u32 = 0;
        let mut last_endpoint = primary_url.clone();

        let result = with_retry(policy, |index, registration| {
            let target = join_url(&rotation[index as usize % rotation.len()], path);
            last_attempt = index;
            last_endpoint.clone_from(&target);
            self.attempt_once(method.clone(), target, body.clone(), policy, registration)
        })
        .await;

        let metrics = RequestMetrics {
            response_time_ms: started.elapsed().as_millis() as u64,
            retries: last_attempt,
            endpoint: last_endpoint,
        };

        match result {
            Ok(payload) => {
                self.observer
                    .on_request_end(method.as_str(), &primary_url, &metrics, true);
                Ok(Completed {
                    data: payload,
                    metrics,
                })
            }
            Err(error) => {
                self.observer
                    .on_exception(method.as_str(), &primary_url, &error);
                self.observer
                    .on_request_end(method.as_str(), &primary_url, &metrics, false);
                Err(RequestFailure { error, metrics })
            }
        }
    }

    /// One network attempt: build, send, validate status, decode.
    async fn attempt_once(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
        policy: &RequestPolicy,
        registration: AbortRegistration,
    ) -> Result<Payload, ChutesError> {
        let mut request = self.client.request(method, &url);
        request = request.header(
            header::AUTHORIZATION,
            format!("Bearer {}", self.config.api_key),
        );
        for (name, value) in &policy.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = body {
            request = request.json(body);
        }
        if self.config.enable_logging {
            debug!(%url, "sending request");
        }

        let send = Abortable::new(request.send(), registration);
        let response = match send.await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) if err.is_timeout() => {
                return Err(ChutesError::timeout(url, policy.timeout))
            }
            Ok(Err(err)) => return Err(ChutesError::Network(err.to_string())),
            Err(Aborted) => return Err(ChutesError::aborted(url)),
        };

        let status = response.status();
        if !(policy.status_is_success)(status.as_u16()) {
            return Err(decode_error_response(status, response).await);
        }
        self.decode_success_response(status, response).await
    }

    /// Decode a successful response according to its content type.
    async fn decode_success_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> Result<Payload, ChutesError> {
        if status == StatusCode::NO_CONTENT {
            return Ok(Payload::Empty);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response
            .text()
            .await
            .map_err(|e| ChutesError::Network(e.to_string()))?;

        if self.config.enable_logging {
            debug!(body = %text, "response body");
        }

        if text.is_empty() {
            Ok(Payload::Empty)
        } else if content_type.contains("application/json") {
            Ok(Payload::Json(serde_json::from_str(&text)?))
        } else {
            Ok(Payload::Text(text))
        }
    }

    fn rotation(&self, policy: &RequestPolicy) -> Vec<String> {
        let mut rotation = Vec::with_capacity(1 + policy.fallback_base_urls.len());
        rotation.push(self.config.base_url.clone());
        rotation.extend(policy.fallback_base_urls.iter().cloned());
        rotation
    }
}

/// Decode an error response body: JSON first, then plain text, then a
/// generic message from the status alone.
async fn decode_error_response(status: StatusCode, response: reqwest::Response) -> ChutesError {
    let code = status.as_u16();
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => {
            if let Ok(details) = serde_json::from_str::<Value>(&text) {
                let message = error_message_from(&details, code);
                ChutesError::response(code, message, Some(details))
            } else {
                ChutesError::response(code, text, None)
            }
        }
        _ => ChutesError::response(code, format!("HTTP Error {code}"), None),
    }
}

/// Pull the most useful human-readable message out of a decoded error body.
fn error_message_from(details: &Value, status: u16) -> String {
    details
        .get("detail")
        .or_else(|| details.get("message"))
        .or_else(|| details.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP Error {status}"))
}

/// Join a base URL and a path with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.chutes.ai", "/chutes"),
            "https://api.chutes.ai/chutes"
        );
        assert_eq!(
            join_url("https://api.chutes.ai/", "chutes"),
            "https://api.chutes.ai/chutes"
        );
    }

    #[test]
    fn test_rotation_sequence() {
        let config = ChutesConfig::new("cpk_0123456789").with_base_url("https://a.chutes.ai");
        let client = HttpClient::new(config).unwrap();
        let policy = RequestPolicy::new().with_fallback_base_urls(vec![
            "https://b.chutes.ai".to_string(),
            "https://c.chutes.ai".to_string(),
        ]);

        let rotation = client.rotation(&policy);
        let targets: Vec<&str> = (0..5u32)
            .map(|index| rotation[index as usize % rotation.len()].as_str())
            .collect();
        assert_eq!(
            targets,
            vec![
                "https://a.chutes.ai",
                "https://b.chutes.ai",
                "https://c.chutes.ai",
                "https://a.chutes.ai",
                "https://b.chutes.ai",
            ]
        );
    }

    #[test]
    fn test_rotation_without_fallbacks_repeats_primary() {
        let config = ChutesConfig::new("cpk_0123456789");
        let client = HttpClient::new(config).unwrap();
        let rotation = client.rotation(&RequestPolicy::default());
        assert_eq!(rotation.len(), 1);
        for index in 0..4u32 {
            assert_eq!(
                rotation[index as usize % rotation.len()],
                crate::config::DEFAULT_BASE_URL
            );
        }
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message_from(&json!({"detail": "No matching chute found!"}), 404),
            "No matching chute found!"
        );
        assert_eq!(
            error_message_from(&json!({"message": "out of capacity"}), 503),
            "out of capacity"
        );
        assert_eq!(error_message_from(&json!({"code": 42}), 500), "HTTP Error 500");
    }

    #[test]
    fn test_payload_conversions() {
        assert_eq!(
            Payload::Json(json!({"id": "x"})).into_json().unwrap(),
            json!({"id": "x"})
        );
        assert_eq!(Payload::Empty.into_json().unwrap(), Value::Null);
        assert!(Payload::Text("pong".to_string()).into_json().is_err());

        assert_eq!(
            Payload::Text("pong".to_string()).into_value(),
            Value::String("pong".to_string())
        );
        assert_eq!(Payload::Empty.into_value(), Value::Null);
    }
}
