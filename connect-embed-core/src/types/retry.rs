//! Bounded retry policy for the acquisition

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy applied inside the single acquisition flight.
///
/// The default makes exactly one attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one; 0 is treated as 1
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay_ms: u64,
    /// Upper bound for any delay
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 200,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Exponential policy with the default delays.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt number `attempt` (0-based).
    ///
    /// Backoff strategy: base, 2×base, 4×base, ... capped at `max_delay_ms`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1_u64 << capped_attempt)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}
