// ABOUTME: Retry policy - attempt budget and exponential backoff schedule.
// ABOUTME: Delays are deterministic: base, 2*base, 4*base, ... with no jitter.

use std::time::Duration;

/// How many times to retry and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry_index` (0 for the first retry).
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let factor = 2u32.checked_pow(retry_index).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// The full sequence of waits this policy can produce.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|i| self.delay_for(i))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(0, crate::config::DEFAULT_BACKOFF_BASE)
    }
}
