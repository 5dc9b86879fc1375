//! Deadline wrapper for single operations
//!
//! Races an operation against a timer. Dropping the losing future is what
//! cancels it; the cancellable form additionally fires an abort signal so a
//! cooperative transport wrapper can observe the cancellation before the
//! drop. Neither form retries.

use crate::error::ChutesError;
use futures::future::{AbortHandle, AbortRegistration};
use std::future::Future;
use std::time::Duration;

/// Race `operation` against a deadline.
///
/// If the deadline fires first the operation future is dropped, cancelling
/// any I/O it owns, and a [`ChutesError::Timeout`] naming `label` is
/// returned. The timer is dropped on both paths.
pub async fn with_timeout<T, F>(
    operation: F,
    timeout: Duration,
    label: &str,
) -> Result<T, ChutesError>
where
    F: Future<Output = Result<T, ChutesError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ChutesError::timeout(label, timeout)),
    }
}

/// Cancellable form of [`with_timeout`].
///
/// `make_operation` receives a fresh [`AbortRegistration`] it can wire into
/// an [`futures::future::Abortable`] around its transport call. When the
/// deadline fires, the matching handle is aborted before the operation is
/// dropped. Each call creates one registration; registrations are never
/// reused across attempts.
pub async fn with_timeout_cancellable<T, F, M>(
    make_operation: M,
    timeout: Duration,
    label: &str,
) -> Result<T, ChutesError>
where
    M: FnOnce(AbortRegistration) -> F,
    F: Future<Output = Result<T, ChutesError>>,
{
    let (handle, registration) = AbortHandle::new_pair();
    let operation = make_operation(registration);
    tokio::pin!(operation);

    tokio::select! {
        outcome = &mut operation => outcome,
        _ = tokio::time::sleep(timeout) => {
            handle.abort();
            Err(ChutesError::timeout(label, timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{Abortable, Aborted};
    use std::future;

    #[tokio::test(start_paused = true)]
    async fn test_never_resolving_operation_times_out() {
        let pending = future::pending::<Result<(), ChutesError>>();
        let result = with_timeout(pending, Duration::from_millis(500), "hang").await;

        match result {
            Err(ChutesError::Timeout { label, timeout_ms }) => {
                assert_eq!(label, "hang");
                assert_eq!(timeout_ms, 500);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_propagates_outcome() {
        let result = with_timeout(
            async { Ok::<_, ChutesError>(7) },
            Duration::from_secs(1),
            "quick",
        )
        .await;
        assert_eq!(result.unwrap(), 7);

        let result = with_timeout(
            async { Err::<(), _>(ChutesError::Network("refused".to_string())) },
            Duration::from_secs(1),
            "quick",
        )
        .await;
        assert!(matches!(result, Err(ChutesError::Network(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellable_deadline_aborts_the_signal() {
        let result = with_timeout_cancellable(
            |registration| async move {
                let inner = Abortable::new(future::pending::<()>(), registration);
                match inner.await {
                    Ok(()) => Ok(()),
                    Err(Aborted) => Err(ChutesError::aborted("inner")),
                }
            },
            Duration::from_millis(200),
            "attempt 0",
        )
        .await;

        // The deadline wins the race; the abort signal fired but the
        // surfaced failure is the timeout.
        match result {
            Err(ChutesError::Timeout { label, timeout_ms }) => {
                assert_eq!(label, "attempt 0");
                assert_eq!(timeout_ms, 200);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellable_completion_propagates() {
        let result = with_timeout_cancellable(
            |registration| async move {
                let inner = Abortable::new(async { 11 }, registration);
                match inner.await {
                    Ok(value) => Ok(value),
                    Err(Aborted) => Err(ChutesError::aborted("inner")),
                }
            },
            Duration::from_secs(1),
            "attempt 0",
        )
        .await;
        assert_eq!(result.unwrap(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_abort_classified_as_aborted() {
        // An abort fired by something other than the deadline surfaces as
        // Aborted, not Timeout.
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let result = with_timeout(
            async move {
                let inner = Abortable::new(future::pending::<()>(), registration);
                match inner.await {
                    Ok(()) => Ok(()),
                    Err(Aborted) => Err(ChutesError::aborted("attempt 0")),
                }
            },
            Duration::from_secs(1),
            "attempt 0",
        )
        .await;

        assert!(matches!(result, Err(ChutesError::Aborted { .. })));
    }
}
