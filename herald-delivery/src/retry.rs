//! Retry policy for delivery operations.
//!
//! This module provides a clean abstraction over retry configuration and
//! logic, making it easy to test and reason about retry behavior
//! independently of the delivery engine.
//!
//! The delay schedule is fully deterministic given the configuration:
//! randomness, where it exists, belongs to the operation being retried,
//! not to the policy.

use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::error::RetryError;

/// Retry policy configuration for delivery operations.
///
/// The same policy drives two independent backoff schedules: the delay
/// between attempts against one provider, and the delay between one
/// provider's exhaustion and the next provider's first attempt. Both
/// are exponential in their own zero-based index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts per provider before falling back.
    ///
    /// A budget of zero means the operation is never invoked.
    ///
    /// Default: 3 attempts
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff (in milliseconds).
    ///
    /// The actual delay is `base * 2^i` for zero-indexed attempt `i`.
    /// Zero degenerates to immediate retries, which tests rely on.
    ///
    /// Default: 500 milliseconds
    #[serde(default = "defaults::base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum backoff delay (in milliseconds).
    ///
    /// Caps the exponential growth to prevent excessively long waits.
    ///
    /// Default: 30000 milliseconds (30 seconds)
    #[serde(default = "defaults::max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            base_delay_ms: defaults::base_delay_ms(),
            max_delay_ms: defaults::max_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backoff delay for a zero-indexed attempt (or provider) index.
    ///
    /// `min(base * 2^index, max)`, computed with saturating arithmetic
    /// so large indices settle at the cap instead of overflowing.
    #[must_use]
    pub const fn backoff_delay(&self, index: u32) -> Duration {
        let millis = if index >= 63 {
            // 2^63 would overflow, use the cap directly
            self.max_delay_ms
        } else {
            let multiplier = 1u64 << index; // 2^index
            let delay = self.base_delay_ms.saturating_mul(multiplier);
            if delay > self.max_delay_ms {
                self.max_delay_ms
            } else {
                delay
            }
        };

        Duration::from_millis(millis)
    }

    /// Execute `operation` until it succeeds or the budget is spent.
    ///
    /// Between failed attempts the task suspends for
    /// [`Self::backoff_delay`] of the attempt just failed; the wait is
    /// cooperative and never busy. The final attempt's failure is
    /// propagated, not swallowed.
    ///
    /// # Errors
    /// - [`RetryError::ZeroBudget`] if `max_attempts` is zero; the
    ///   operation is not invoked and no wait occurs
    /// - [`RetryError::Exhausted`] carrying the last failure once every
    ///   attempt has failed
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.max_attempts == 0 {
            return Err(RetryError::ZeroBudget);
        }

        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(source) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source,
                        });
                    }
                    sleep(self.backoff_delay(attempt - 1)).await;
                }
            }
        }
    }
}

mod defaults {
    pub const fn max_attempts() -> u32 {
        3
    }

    pub const fn base_delay_ms() -> u64 {
        500
    }

    pub const fn max_delay_ms() -> u64 {
        30_000 // 30 seconds
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Instant,
    };

    use super::*;

    fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 500);
        assert_eq!(policy.max_delay_ms, 30_000);
    }

    #[test]
    fn test_backoff_doubles_per_index() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        };

        assert_eq!(policy.backoff_delay(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(4000));

        // Strictly increasing until the cap
        for index in 0..6 {
            assert!(policy.backoff_delay(index) < policy.backoff_delay(index + 1));
        }
    }

    #[test]
    fn test_backoff_caps_at_max() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 4000,
        };

        assert_eq!(policy.backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff_delay(4), Duration::from_millis(4000));
        // Indices past the shift width settle at the cap too
        assert_eq!(policy.backoff_delay(200), Duration::from_millis(4000));
    }

    #[test]
    fn test_zero_base_delay_is_zero_everywhere() {
        let policy = immediate(5);
        for index in 0..10 {
            assert_eq!(policy.backoff_delay(index), Duration::ZERO);
        }
    }

    #[tokio::test]
    async fn test_run_succeeds_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = immediate(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, &str>(42) }
            })
            .await;

        assert_eq!(result.expect("should succeed"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let result = immediate(3)
            .run(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err("transient")
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.expect("third attempt succeeds"), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_propagates_final_failure() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = immediate(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("persistent") }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert_eq!(source, "persistent");
            }
            other => panic!("Expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_budget_never_invokes_and_never_waits() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay_ms: 10_000,
            max_delay_ms: 10_000,
        };

        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result: Result<(), RetryError<&str>> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("never seen") }
            })
            .await;

        assert!(matches!(result, Err(RetryError::ZeroBudget)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
