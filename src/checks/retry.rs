//! Exponential backoff retry for status fetches.
//!
//! Only transient errors are retried (see
//! [`PushReleaseError::is_transient`]); anything else is returned
//! immediately.

use log::*;
use std::{future::Future, time::Duration};

use crate::{PushReleaseError, checks::delay::Delay};

/// Configuration for exponential backoff retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap for exponential growth.
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// 3 retries with 2s, 4s, 8s delays.
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(16),
        backoff_multiplier: 2.0,
    };

    /// Single attempt, errors are returned as they occur.
    pub const NONE: Self = Self {
        max_retries: 0,
        initial_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        backoff_multiplier: 1.0,
    };

    /// Delay for the given retry attempt (0-indexed):
    /// `initial_delay * backoff_multiplier^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped_secs = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of a retried operation.
#[derive(Debug)]
pub enum RetryResult<T> {
    Success(T),
    /// Transient failures persisted through every attempt.
    Exhausted {
        last_error: PushReleaseError,
        /// Attempts made, including the initial one.
        attempts: u32,
    },
    /// A non-transient error; not retried.
    Permanent(PushReleaseError),
}

/// Run `operation` until it succeeds, fails permanently, or runs out of
/// retries, waiting on `delay` between attempts.
pub async fn retry_with_backoff<T, F, Fut>(
    config: RetryConfig,
    delay: &dyn Delay,
    mut operation: F,
) -> RetryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PushReleaseError>>,
{
    let max_attempts = config.max_retries + 1;
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return RetryResult::Success(value),
            Err(err) => {
                attempt += 1;

                if !err.is_transient() {
                    return RetryResult::Permanent(err);
                }

                if attempt >= max_attempts {
                    return RetryResult::Exhausted {
                        last_error: err,
                        attempts: attempt,
                    };
                }

                let wait = config.delay_for_attempt(attempt - 1);
                warn!(
                    "attempt {attempt}/{max_attempts} failed: {err}: retrying in {:?}",
                    wait
                );
                delay.wait(wait).await;
            }
        }
    }
}
