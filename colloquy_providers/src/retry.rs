use std::time::Duration;

use colloquy_core::CompletionError;
use tokio::time::sleep;
use tracing::warn;

/// Exponential backoff settings for transient completion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry; doubled for each further retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based).
    #[must_use]
    pub fn delay_for(&self, retry: usize) -> Duration {
        let factor = 2_u32.saturating_pow(u32::try_from(retry).unwrap_or(u32::MAX));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Retry an async completion operation with exponential backoff.
///
/// Only errors for which [`CompletionError::is_retryable`] holds are retried;
/// anything else is returned immediately. After the last retry the final
/// error is returned.
pub async fn retry_with_backoff<F, Fut, T>(
    mut operation: F,
    policy: &RetryPolicy,
) -> Result<T, CompletionError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CompletionError>>,
{
    let total_attempts = policy.max_retries + 1;
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && retry < policy.max_retries => {
                let delay = policy.delay_for(retry);
                warn!(
                    "Request failed (attempt {}/{}): {e}. Retrying after {}ms...",
                    retry + 1,
                    total_attempts,
                    delay.as_millis()
                );
                sleep(delay).await;
                retry += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
