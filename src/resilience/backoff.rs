//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay after the `attempt`-th failed poll (1-based).
///
/// Doubles from `base` per attempt, is capped at `max`, then gets up to 10%
/// jitter added so pollers sharing a node do not synchronize.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u32.saturating_pow(attempt - 1);
    let capped = base.saturating_mul(factor).min(max);

    let jitter_range = capped.as_millis() as u64 / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    capped + Duration::from_millis(jitter)
}
