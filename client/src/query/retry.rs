//! Retry policy shared by queries and mutations.

use std::future::Future;
use std::time::Duration;

use crate::core::ApiError;

/// Decides whether a failed attempt is tried again, and after how long.
///
/// Authorization failures (401/403) stop immediately. Anything else is
/// retried until `max_attempts` attempts have failed. The decision reads the
/// error's status code, never its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failure; doubles per further failure
    pub base_delay: Duration,
    /// Upper bound for the delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget, no waiting between attempts.
    pub fn without_delay(self) -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..self
        }
    }

    /// `failure_count` is the number of attempts that have failed so far,
    /// including the one that produced `error`.
    pub fn should_retry(&self, failure_count: u32, error: &ApiError) -> bool {
        if error.is_auth_failure() {
            return false;
        }
        failure_count < self.max_attempts
    }

    /// Wait before the attempt following failure number `failure_count`.
    pub fn delay_for(&self, failure_count: u32) -> Duration {
        let exponent = failure_count.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Run `attempt` until it succeeds or the policy gives up.
    ///
    /// Only the final error is returned; intermediate failures are logged.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut failures = 0u32;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    failures += 1;
                    if !self.should_retry(failures, &error) {
                        return Err(error);
                    }

                    let delay = self.delay_for(failures);
                    tracing::debug!(
                        attempt = failures,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
