//! Retry executor with randomized exponential backoff.
//!
//! Every provider call runs through [`retry_with_backoff`]. Any error counts
//! toward the attempt budget; there is no classification of retryable vs.
//! fatal errors. After the budget is spent the last error is returned to the
//! caller, which decides how to represent it.

use rand::Rng;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;
use tracing::debug;

/// Parameters of the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Base delay before the first retry
    pub min_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Exponential growth factor per retry
    pub factor: f64,
    /// Multiply each delay by a random factor in `[1, 2)`
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Default policy with a custom retry budget.
    pub fn from_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Policy that gives up after the first failure.
    pub fn no_retry() -> Self {
        Self::from_max_retries(0)
    }

    pub fn with_delays(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let random = if self.jitter {
            rand::thread_rng().gen_range(1.0..2.0)
        } else {
            1.0
        };
        let millis = self.min_delay.as_millis() as f64 * self.factor.powi(exponent) * random;
        let capped = millis.round().min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Information handed to the observer after each failed attempt.
#[derive(Debug)]
pub struct FailedAttempt<'a, E> {
    /// 1-based attempt number that just failed
    pub attempt: u32,
    /// Attempts still available after this one
    pub retries_left: u32,
    pub error: &'a E,
    /// Delay before the next attempt; `None` when giving up
    pub next_delay: Option<Duration>,
}

/// Run `operation` until it succeeds or the retry budget is exhausted.
///
/// `observer` is called on every failed attempt, including the last one.
/// A panicking observer is ignored and does not change the retry flow.
pub async fn retry_with_backoff<T, E, F, Fut, O>(
    policy: &RetryPolicy,
    mut operation: F,
    mut observer: O,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    O: FnMut(&FailedAttempt<'_, E>),
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let retries_left = policy.max_retries.saturating_sub(attempt - 1);
        let next_delay = (retries_left > 0).then(|| policy.delay_for(attempt));

        {
            let failed = FailedAttempt {
                attempt,
                retries_left,
                error: &error,
                next_delay,
            };
            if catch_unwind(AssertUnwindSafe(|| observer(&failed))).is_err() {
                debug!("Retry observer panicked on attempt {}", attempt);
            }
        }

        match next_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => return Err(error),
        }
    }
}
