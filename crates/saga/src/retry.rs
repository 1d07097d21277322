//! Bounded-attempt, fixed-delay retry around a single remote call.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SagaError;

/// Abstraction over the inter-attempt delay.
///
/// Injected into the retry policy so tests can observe the schedule without
/// actually waiting.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry policy for the remote confirmation call.
///
/// Retries only when the wrapped call returns an error; a successful call
/// carrying an explicit refusal is final and returned as-is. After the
/// attempt budget is spent, the last error is folded into
/// [`SagaError::RetryExhausted`] so the caller can treat exhaustion
/// uniformly instead of inspecting the raw failure.
///
/// Reads overrides from environment variables in [`from_env`](Self::from_env):
/// - `BOOKING_RETRY_MAX_ATTEMPTS` (default: `3`)
/// - `BOOKING_RETRY_DELAY_MS` (default: `1000`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Loads the policy from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: std::env::var("BOOKING_RETRY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
            delay: std::env::var("BOOKING_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }

    /// Runs the call until it returns, the budget is spent, or it refuses.
    pub async fn execute<T, F, Fut>(&self, sleep: &impl Sleep, mut call: F) -> Result<T, SagaError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SagaError>>,
    {
        let mut last_error: Option<SagaError> = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                sleep.sleep(self.delay).await;
            }

            tracing::debug!(attempt, max_attempts = self.max_attempts, "remote call attempt");
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "remote call attempt failed");
                    last_error = Some(e);
                }
            }
        }

        metrics::counter!("booking_retry_exhaustions_total").increment(1);
        Err(SagaError::RetryExhausted {
            attempts: self.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts were made".to_string()),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Sleep;

    /// Sleeper that records requested delays instead of waiting.
    #[derive(Clone, Default)]
    pub struct RecordingSleep {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleep {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn delays(&self) -> Vec<Duration> {
            self.delays.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleep for RecordingSleep {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }
}
