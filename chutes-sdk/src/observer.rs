//! Request observability hooks
//!
//! Observers are pure side-effecting listeners around the executor's
//! request/response boundary. They never alter control flow or the
//! returned result. Swap in any structured-logging backend by implementing
//! [`RequestObserver`] and passing it at client construction.

use crate::error::ChutesError;
use crate::outcome::RequestMetrics;
use tracing::{debug, error, info};

/// Hooks fired around every executed request.
pub trait RequestObserver: Send + Sync {
    /// Fired once before the first attempt.
    fn on_request_start(&self, method: &str, url: &str);

    /// Fired once after the outcome is known, success or failure.
    fn on_request_end(&self, method: &str, url: &str, metrics: &RequestMetrics, success: bool);

    /// Fired when the request settles on a failure, before `on_request_end`.
    fn on_exception(&self, method: &str, url: &str, error: &ChutesError);
}

/// Default observer backed by the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request_start(&self, method: &str, url: &str) {
        debug!(%method, %url, "request started");
    }

    fn on_request_end(&self, method: &str, url: &str, metrics: &RequestMetrics, success: bool) {
        if success {
            info!(
                %method,
                %url,
                response_time_ms = metrics.response_time_ms,
                retries = metrics.retries,
                endpoint = %metrics.endpoint,
                "request completed"
            );
        } else {
            error!(
                %method,
                %url,
                response_time_ms = metrics.response_time_ms,
                retries = metrics.retries,
                endpoint = %metrics.endpoint,
                "request failed"
            );
        }
    }

    fn on_exception(&self, method: &str, url: &str, error: &ChutesError) {
        error!(%method, %url, %error, "request raised an error");
    }
}

/// Observer that records nothing. Useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RequestObserver for NullObserver {
    fn on_request_start(&self, _method: &str, _url: &str) {}
    fn on_request_end(&self, _method: &str, _url: &str, _metrics: &RequestMetrics, _success: bool) {}
    fn on_exception(&self, _method: &str, _url: &str, _error: &ChutesError) {}
}
