//! The typed success/failure envelope returned by the request executor.
//!
//! Both variants carry [`RequestMetrics`]; callers always learn how long a
//! request took, how many retries it consumed, and which endpoint served
//! the final attempt.

use crate::error::ChutesError;
use thiserror::Error;

/// Measurements stamped on every request outcome, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetrics {
    /// Wall-clock time from request start to final outcome, including
    /// backoff delays between retries.
    pub response_time_ms: u64,
    /// Index of the final attempt (0 when the first attempt settled it).
    pub retries: u32,
    /// Full URL targeted by the final attempt.
    pub endpoint: String,
}

/// A successful request outcome.
#[derive(Debug, Clone)]
pub struct Completed<T> {
    /// The decoded response payload.
    pub data: T,
    /// Request measurements.
    pub metrics: RequestMetrics,
}

/// A failed request outcome.
///
/// Wraps the classified [`ChutesError`] together with the metrics of the
/// attempt sequence that produced it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RequestFailure {
    /// The classified failure.
    #[source]
    pub error: ChutesError,
    /// Request measurements.
    pub metrics: RequestMetrics,
}

impl RequestFailure {
    /// Discard the metrics and keep the underlying error.
    pub fn into_error(self) -> ChutesError {
        self.error
    }
}

/// The universal return type of the request executor.
pub type RequestResult<T> = Result<Completed<T>, RequestFailure>;
