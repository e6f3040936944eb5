use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Failure classification for [`with_retry`]. `Retryable` errors are attempted
/// again after a backoff delay; `Fatal` errors short-circuit immediately
/// (retrying will not fix malformed data).
pub enum RetryError<E> {
    Retryable(E),
    Fatal(E),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after a failed attempt `n` (1-based): `base * 2^(n-1)`.
    /// No jitter; delays are deterministic given the attempt index.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Invoke `op` up to `policy.max_attempts` times with exponential backoff
/// between attempts. Knows nothing about what it wraps; any idempotent
/// operation can use it. After the final attempt the underlying error is
/// propagated as-is rather than a generic "retries exhausted".
pub async fn with_retry<F, Fut, T, E>(op: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(RetryError::Fatal(err)) => return Err(err),
            Err(RetryError::Retryable(err)) => {
                if attempt >= policy.max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_after(attempt);
                warn!(
                    error = %err,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, backing off"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
