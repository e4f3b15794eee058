//! Response-driven retries for transient backend failures.
//!
//! Only errors classified as [`ErrorKind::Transient`](crate::ErrorKind) are
//! retried. The wait honours a `Retry-After` header when the backend sent one
//! and otherwise doubles from `base_delay`, capped at `max_delay`.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }

    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Wait before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32, err: &BackendError) -> Duration {
        let backoff = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        err.retry_after().unwrap_or(backoff).min(self.max_delay)
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, BackendError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt, &err);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient backend failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
