//! Bounded retry policy.
//!
//! # Responsibilities
//! - Hold the attempt cap and delay strategy for outbound calls
//! - Run an async operation until it succeeds or the cap is reached
//!
//! # Design Decisions
//! - Attempts are counted in total, the first call included
//! - Exhaustion returns the last error; callers decide how to degrade
//! - Every failed attempt is logged with its attempt number

use std::future::Future;
use std::time::Duration;

use crate::config::{BackoffStrategy, RetryConfig};
use crate::resilience::backoff::{calculate_backoff, fixed_delay};

/// Attempt cap plus the pause taken between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub max_delay_ms: u64,
    pub strategy: BackoffStrategy,
}

impl RetryPolicy {
    /// Fixed pause between attempts.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self {
            max_attempts,
            delay_ms,
            max_delay_ms: delay_ms,
            strategy: BackoffStrategy::Fixed,
        }
    }

    /// Pause to take after `attempt` failed attempts.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed => fixed_delay(attempt, self.delay_ms),
            BackoffStrategy::Exponential => {
                calculate_backoff(attempt, self.delay_ms, self.max_delay_ms)
            }
        }
    }

    /// Run `op` until it succeeds or `max_attempts` is reached.
    ///
    /// `op` receives the 1-based attempt number. On exhaustion the last error
    /// is returned together with the number of attempts made.
    pub async fn run<T, E, F, Fut>(&self, target: &str, mut op: F) -> Result<T, Exhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        operation = %target,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Attempt failed"
                    );
                    if attempt >= max_attempts {
                        return Err(Exhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                    tokio::time::sleep(self.delay_after(attempt)).await;
                }
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay_ms: config.delay_ms,
            max_delay_ms: config.max_delay_ms,
            strategy: config.strategy,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// Every attempt failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(1));
    }

    #[test]
    fn test_fixed_delay_saturates() {
        let policy = RetryPolicy::fixed(3, Duration::MAX);
        assert_eq!(policy.delay_ms, u64::MAX);
        assert_eq!(policy.max_delay_ms, u64::MAX);

        let policy = RetryPolicy::fixed(3, Duration::from_millis(250));
        assert_eq!(policy.delay_ms, 250);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let result: Result<u32, _> = policy
            .run("test", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err("boom")
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let result: Result<(), _> = policy
            .run("test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("down") }
            })
            .await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy::fixed(0, Duration::ZERO);
        let result: Result<(), _> = policy.run("test", |_| async { Err::<(), _>("x") }).await;
        assert_eq!(result.unwrap_err().attempts, 1);
    }
}
