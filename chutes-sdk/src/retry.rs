//! Retry engine
//!
//! Drives an attempt function through a strictly sequential retry loop:
//! attempt N+1 never starts before attempt N's outcome is known and the
//! backoff delay has elapsed. Each attempt runs under its own deadline and
//! owns a fresh abort registration.

use crate::error::ChutesError;
use crate::policy::RequestPolicy;
use crate::timeout::with_timeout_cancellable;
use futures::future::AbortRegistration;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff delay before attempt `attempt` (1-based): exponential doubling
/// from the base delay with ±20% jitter, so synchronized clients do not
/// hammer a recovering backend in lockstep.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    let scaled = base.as_millis() as f64 * 2f64.powi(exponent as i32);
    let jitter = 0.8 + rand::thread_rng().gen::<f64>() * 0.4;
    Duration::from_millis((scaled * jitter) as u64)
}

/// Invoke `attempt` until it succeeds, a terminal failure occurs, or
/// `policy.max_retries` retries are exhausted.
///
/// `attempt` receives the attempt index (starting at 0) and an abort
/// registration valid for that attempt only. Each invocation is wrapped in
/// [`with_timeout_cancellable`] with `policy.timeout`. Retry eligibility is
/// decided by [`ChutesError::is_retryable`]; the last observed failure is
/// the one surfaced.
pub async fn with_retry<T, F, Fut>(policy: &RequestPolicy, mut attempt: F) -> Result<T, ChutesError>
where
    F: FnMut(u32, AbortRegistration) -> Fut,
    Fut: Future<Output = Result<T, ChutesError>>,
{
    let mut index: u32 = 0;
    loop {
        let label = format!("attempt {index}");
        let outcome =
            with_timeout_cancellable(|registration| attempt(index, registration), policy.timeout, &label)
                .await;

        match outcome {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && index < policy.max_retries => {
                index += 1;
                let delay = backoff_delay(policy.retry_base_delay, index);
                warn!(
                    attempt = index,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_policy(max_retries: u32) -> RequestPolicy {
        RequestPolicy::new()
            .with_max_retries(max_retries)
            .with_timeout(Duration::from_secs(1))
            .with_retry_base_delay(Duration::from_millis(10))
    }

    #[test]
    fn test_backoff_delay_within_jitter_bounds() {
        let base = Duration::from_millis(1000);
        for attempt in 1..=4u32 {
            let scaled = 1000u64 * 2u64.pow(attempt - 1);
            let low = (scaled as f64 * 0.8) as u128;
            let high = (scaled as f64 * 1.2) as u128;
            for _ in 0..50 {
                let delay = backoff_delay(base, attempt).as_millis();
                assert!(
                    delay >= low && delay <= high,
                    "attempt {attempt}: delay {delay}ms outside [{low}, {high}]"
                );
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_count_never_exceeds_cap() {
        let policy = quick_policy(3);
        let mut calls = 0u32;
        let result = with_retry(&policy, |_, _| {
            calls += 1;
            async { Err::<(), _>(ChutesError::Network("refused".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(ChutesError::Network(_))));
        assert_eq!(calls, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_terminal() {
        let policy = quick_policy(3);
        let mut calls = 0u32;
        let result = with_retry(&policy, |_, _| {
            calls += 1;
            async { Err::<(), _>(ChutesError::response(400, "HTTP Error 400", None)) }
        })
        .await;

        assert_eq!(calls, 1);
        assert_eq!(result.unwrap_err().status(), Some(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_retried_to_the_cap() {
        let policy = quick_policy(2);
        let mut calls = 0u32;
        let result = with_retry(&policy, |_, _| {
            calls += 1;
            async { Err::<(), _>(ChutesError::response(404, "HTTP Error 404", None)) }
        })
        .await;

        assert_eq!(calls, 3);
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let policy = quick_policy(3);
        let mut calls = 0u32;
        let result = with_retry(&policy, |index, _| {
            calls += 1;
            async move {
                if index < 2 {
                    Err(ChutesError::response(503, "HTTP Error 503", None))
                } else {
                    Ok("ready")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ready");
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let policy = quick_policy(0);
        let mut calls = 0u32;
        let result = with_retry(&policy, |_, _| {
            calls += 1;
            async { Err::<(), _>(ChutesError::response(503, "HTTP Error 503", None)) }
        })
        .await;

        assert_eq!(calls, 1);
        assert_eq!(result.unwrap_err().status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_attempt_times_out_and_retries() {
        let policy = quick_policy(1).with_timeout(Duration::from_millis(100));
        let mut calls = 0u32;
        let result = with_retry(&policy, |_, _| {
            calls += 1;
            async { std::future::pending::<Result<(), ChutesError>>().await }
        })
        .await;

        assert_eq!(calls, 2);
        match result {
            Err(ChutesError::Timeout { label, .. }) => assert_eq!(label, "attempt 1"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
