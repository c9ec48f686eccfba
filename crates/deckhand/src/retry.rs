//! Bounded exponential backoff
//!
//! `with_retry` re-runs an async operation while its error reports itself
//! retryable, up to `max_attempts` total attempts. Delays grow as
//! `base_delay * multiplier^n` (250ms, 750ms, 2.25s with the defaults).

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Classifies an error as worth another attempt
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            multiplier: 3,
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(self.multiplier.saturating_pow(attempt))
    }
}

/// Run `operation` under `policy`.
///
/// Non-retryable errors are returned immediately. When `deadline` is set,
/// no retry is started if its backoff would end at or past the deadline.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            tracing::debug!("Not retrying non-retryable error: {}", err);
            return Err(err);
        }

        if attempt + 1 >= max_attempts {
            tracing::warn!("Giving up after {} attempt(s): {}", attempt + 1, err);
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        if deadline.is_some_and(|deadline| Instant::now() + delay >= deadline) {
            tracing::warn!("Deadline reached, not retrying: {}", err);
            return Err(err);
        }

        tracing::info!(
            "[retry] Attempt {} failed, retrying in {}ms: {}",
            attempt + 1,
            delay.as_millis(),
            err
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct FakeError {
        status: u16,
    }

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "HTTP {}", self.status)
        }
    }

    impl Retryable for FakeError {
        fn is_retryable(&self) -> bool {
            !(400..500).contains(&self.status) || self.status == 429
        }
    }

    #[test]
    fn test_default_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(750));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_retried_until_exhausted() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), FakeError> = with_retry(&RetryPolicy::default(), None, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError { status: 429 }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(250 + 750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), FakeError> = with_retry(&RetryPolicy::default(), None, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError { status: 400 }) }
        })
        .await;

        assert_eq!(result.unwrap_err().status, 400);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::default(), None, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(FakeError { status: 503 })
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_retries() {
        let calls = AtomicU32::new(0);
        let deadline = Instant::now() + Duration::from_millis(100);

        let result: Result<(), FakeError> =
            with_retry(&RetryPolicy::default(), Some(deadline), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError { status: 502 }) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
