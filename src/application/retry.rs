use crate::domain::error::DomainError;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Bounded exponential backoff for transient upstream failures. Retry
/// policy lives with the caller; the leaf clients never retry on their own.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(200),
        }
    }

    pub fn with_base_delay(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Runs `op`, retrying only errors flagged transient (transport
    /// failures, 5xx, timeouts). Parse and validation errors return on the
    /// first attempt.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let backoff = self.base_delay * 2u32.saturating_pow(attempt);
                    tracing::debug!(attempt, error = %e, "retrying transient failure");
                    tokio::time::sleep(backoff + jitter(self.base_delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Cheap jitter in [0, base_delay), derived from the wall clock.
fn jitter(base_delay: Duration) -> Duration {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0) as u64;
    let cap = base_delay.as_millis().max(1) as u64;
    Duration::from_millis(nanos % cap)
}
