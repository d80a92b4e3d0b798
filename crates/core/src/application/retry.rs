// Retry logic for the tag write step
use crate::application::worker::constants::{
    TAG_WRITE_BACKOFF_FACTOR, TAG_WRITE_BASE_DELAY, TAG_WRITE_MAX_ATTEMPTS, TAG_WRITE_MAX_DELAY,
};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry decision result
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the given delay
    Retry(Duration),
    /// Attempts exhausted
    Failed,
}

/// Bounded exponential backoff
///
/// `max_attempts` counts the first try, so 3 means one call plus at most
/// two retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::tag_write()
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_attempts` - Total attempts including the first (at least 1)
    /// * `base_delay` - Delay before the first retry
    /// * `backoff_factor` - Multiplier applied per further retry
    /// * `max_delay` - Upper bound for any single delay
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        backoff_factor: f64,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff_factor,
            max_delay,
        }
    }

    /// Policy for object tag writes: 3 attempts, 100ms doubling, capped at 2s
    pub fn tag_write() -> Self {
        Self::new(
            TAG_WRITE_MAX_ATTEMPTS,
            TAG_WRITE_BASE_DELAY,
            TAG_WRITE_BACKOFF_FACTOR,
            TAG_WRITE_MAX_DELAY,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide what to do after `attempt` (1-based) has failed
    ///
    /// Backoff formula:
    /// delay = base_delay * (backoff_factor ^ (attempt - 1)) * jitter
    ///
    /// Jitter is ±10%, derived from `jitter_key` so the same key always
    /// waits the same amount.
    pub fn should_retry(&self, attempt: u32, jitter_key: &str) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::Failed;
        }

        let exponent = attempt.saturating_sub(1) as i32;
        let base_ms = self.base_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);

        let jitter_seed = jitter_key.chars().map(|c| c as u32).fold(0u32, u32::wrapping_add);
        let jitter_factor = 0.9 + ((jitter_seed % 21) as f64 / 100.0); // 0.9 to 1.1

        let delay = Duration::from_millis((base_ms * jitter_factor) as u64).min(self.max_delay);
        RetryDecision::Retry(delay)
    }

    /// Run `op` until it succeeds or attempts are exhausted
    ///
    /// Returns the last error when every attempt failed.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label = %label, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => match self.should_retry(attempt, label) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            label = %label,
                            attempt,
                            max_attempts = self.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Attempt failed, retrying"
                        );
                        sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::Failed => {
                        warn!(
                            label = %label,
                            attempts = attempt,
                            error = %e,
                            "Max retry attempts reached"
                        );
                        return Err(e);
                    }
                },
            }
        }
    }
}
