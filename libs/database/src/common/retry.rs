use core_config::{ConfigError, FromEnv, env_parse};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff for the startup connection, while the database
/// container may still be booting.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Scale each delay to 50-100% so replicas do not reconnect in lockstep
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_retries: env_parse("DB_CONNECT_RETRIES", defaults.max_retries)?,
            initial_delay: Duration::from_millis(env_parse("DB_CONNECT_DELAY_MS", 200u64)?),
            ..defaults
        })
    }
}

impl RetryConfig {
    /// Delay before retry `attempt` (1-based): doubles each time, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }

    fn sleep_for(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        if self.jitter { jittered(delay) } else { delay }
    }
}

fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay * percent as u32 / 100
}

/// Runs `operation` until it succeeds or the retries are spent, returning
/// the last error.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Connected after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        attempt += 1;
        if attempt > config.max_retries {
            warn!(attempts = attempt, error = %error, "Giving up");
            return Err(error);
        }

        let delay = config.sleep_for(attempt);
        debug!(attempt, ?delay, error = %error, "Attempt failed, retrying");
        tokio::time::sleep(delay).await;
    }
}

/// [`retry_with_backoff`] with settings from the environment, falling back
/// to [`RetryConfig::default`] when they do not parse.
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let config = RetryConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Invalid retry settings, using defaults");
        RetryConfig::default()
    });
    retry_with_backoff(operation, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            jitter: false,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_with_backoff(
            move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 => Err("not yet"),
                    _ => Ok("connected"),
                }
            },
            quick(5),
        )
        .await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), String> = retry_with_backoff(
            move || async move { Err(format!("fail {}", calls.fetch_add(1, Ordering::SeqCst))) },
            quick(2),
        )
        .await;

        assert_eq!(result, Err("fail 2".to_string()));
    }

    #[test]
    fn test_delay_doubles_then_caps() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            ..RetryConfig::default()
        };
        let delays: Vec<_> = (1..=4).map(|n| config.delay_for(n).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 500]);
        assert_eq!(config.delay_for(80), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_within_half() {
        for _ in 0..10 {
            let delay = jittered(Duration::from_millis(1000)).as_millis();
            assert!((500..=1000).contains(&delay));
        }
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [("DB_CONNECT_RETRIES", Some("9")), ("DB_CONNECT_DELAY_MS", Some("50"))],
            || {
                let config = RetryConfig::from_env().unwrap();
                assert_eq!(config.max_retries, 9);
                assert_eq!(config.initial_delay, Duration::from_millis(50));
                assert_eq!(config.max_delay, RetryConfig::default().max_delay);
            },
        );
    }
}
