//! Confirmation poll policy.
//!
//! # Responsibilities
//! - Hold the attempt budget (default 5) and the inter-attempt delay (default 5 s)
//! - Compute the delay before the next attempt for the configured strategy

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::backoff::backoff_delay;

/// Default number of status polls before reporting a confirmation timeout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay between status polls.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(5);

/// How the delay between polls evolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStrategy {
    /// Same delay between every attempt.
    #[default]
    Fixed,
    /// Exponential growth from the base delay, capped at `max_delay`.
    Backoff,
}

/// Retry budget and cadence for confirmation polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub max_delay: Duration,
    pub strategy: PollStrategy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_POLL_DELAY,
            max_delay: Duration::from_secs(60),
            strategy: PollStrategy::Fixed,
        }
    }
}

impl PollPolicy {
    /// Fixed-delay policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            max_delay: delay,
            strategy: PollStrategy::Fixed,
        }
    }

    /// Backoff policy for chains whose finality is long or variable.
    pub fn backoff(max_attempts: u32, base: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            delay: base,
            max_delay,
            strategy: PollStrategy::Backoff,
        }
    }

    /// Delay to wait after the `attempt`-th poll (1-based) came back unresolved.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.strategy {
            PollStrategy::Fixed => self.delay,
            PollStrategy::Backoff => backoff_delay(attempt, self.delay, self.max_delay),
        }
    }

    /// Whether another poll is allowed after `attempt` polls.
    pub fn has_remaining(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
