use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Retry policy with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of full attempts (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in ms
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after every failed attempt
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

/// Default number of attempts
fn default_max_attempts() -> u32 {
    3
}

/// Default base delay (1 second)
fn default_base_delay_ms() -> u64 {
    1000
}

/// Default backoff multiplier
fn default_backoff_factor() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay to sleep before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let millis = self.base_delay_ms as f64 * self.backoff_factor.powi(retry as i32);
        Duration::from_millis(millis as u64)
    }
}

/// Run an operation under a retry policy with exponential backoff.
///
/// Non-retryable errors short-circuit immediately; retryable ones are
/// retried until the attempt budget is exhausted, with the last error
/// returned to the caller.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = policy.delay_for(attempt - 1);
            ::log::warn!(
                "{} attempt {} of {} failed, retrying in {:.1}s",
                label,
                attempt,
                attempts,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                ::log::warn!("{} failed: {}", label, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    ::log::error!("{} failed after {} attempts", label, attempts);
    Err(last_error
        .unwrap_or_else(|| ScrapeError::Config(format!("{label}: retry budget was zero"))))
}

/// Run a future while logging how long it took
pub async fn timed<T, Fut>(label: &str, future: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let start = std::time::Instant::now();
    let output = future.await;
    ::log::debug!(
        "{} completed in {:.2} seconds",
        label,
        start.elapsed().as_secs_f64()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_transient_failures() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = calls.clone();
        let result = with_retry(&policy, "test", move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(ScrapeError::Navigation {
                        url: "https://example.com".to_string(),
                        reason: "transient".to_string(),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_short_circuits() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = calls.clone();
        let result: Result<(), _> = with_retry(&policy, "test", move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ScrapeError::Config("bad".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(ScrapeError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_last_error() {
        let policy = RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        };
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = calls.clone();
        let result: Result<(), _> = with_retry(&policy, "test", move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ScrapeError::Navigation {
                    url: "https://example.com".to_string(),
                    reason: "still down".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ScrapeError::Navigation { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
