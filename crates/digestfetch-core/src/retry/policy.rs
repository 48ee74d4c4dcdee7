use crate::config::RetryConfig;
use crate::fetch::FetchError;
use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up and report the error.
    NoRetry,
    /// Try again after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with a cap, applied by callers around a fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let max_delay = Duration::from_secs(cfg.max_delay_secs);
        // inf, NaN or huge values from config.toml must not panic; clamp to max_delay.
        let base_delay = Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = the attempt that just failed first time).
    pub fn decide(&self, attempt: u32, err: &FetchError) -> RetryDecision {
        if attempt >= self.max_attempts || !err.is_retryable() {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), capped.
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(factor).min(self.max_delay))
    }
}
