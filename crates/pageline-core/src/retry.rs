//! Retry with exponential backoff for page requests

use std::fmt::Display;
use std::time::Duration;

use indicatif::ProgressBar;

/// Bounded retry policy: `max_retries` retries after the first attempt,
/// sleeping `base_delay * 2^attempt` before retry `attempt` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff: 2^attempt units (2, 4, 8, ...)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Error returned once retries are exhausted.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Total attempts made (first try + retries)
    pub attempts: u32,
    pub last_error: E,
}

/// Retry a fallible operation with exponential backoff.
///
/// On failure, logs a warning, updates the progress bar, calls `sleep` with
/// the backoff delay, and retries up to `policy.max_retries` times.
/// Callers pass `std::thread::sleep` outside of tests.
///
/// Returns `Ok(T)` on first success, or the final `Err` on exhaustion.
pub fn retry_with_sleep<T, E: Display>(
    label: &str,
    policy: &RetryPolicy,
    pb: &ProgressBar,
    mut sleep: impl FnMut(Duration),
    mut attempt_fn: impl FnMut() -> Result<T, E>,
) -> Result<T, RetryExhausted<E>> {
    let max_retries = policy.max_retries;
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                let delay = policy.backoff_duration(attempt);
                pb.set_message(format!("retry {attempt}/{max_retries}..."));
                log::warn!("{label}: retry {attempt}/{max_retries} in {delay:?} after error: {e}");
                sleep(delay);
            }
            Err(e) => {
                log::error!("{label}: failed after {max_retries} retries: {e}");
                return Err(RetryExhausted {
                    attempts: attempt + 1,
                    last_error: e,
                });
            }
        }
    }
}
