//! Bounded exponential backoff.

use std::time::Duration;

use crate::config::ClientConfig;

/// Fixed retry policy: `max_retries` total attempts, sleeping
/// `base_delay * 2^n` after failed attempt `n` when another one follows.
/// No jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries, config.base_delay)
    }

    /// Delay before attempt `attempt + 1`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(attempt)
            .ok()
            .and_then(|n| 2u32.checked_pow(n))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Sum of every sleep in a fully exhausted run.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries.saturating_sub(1))
            .map(|attempt| self.backoff(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}
