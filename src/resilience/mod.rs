//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Confirmation polling:
//!     → retries.rs (attempt budget, terminal vs retryable status)
//!     → backoff.rs (delay between attempts when backoff is configured)
//! ```
//!
//! # Design Decisions
//! - Polling is a bounded loop; exhausting the budget is the only cancellation
//! - Attempts are strictly sequential, never concurrent for one hash
//! - Broadcasts are never retried here; a rejected tx is terminal

pub mod backoff;
pub mod retries;

pub use retries::{PollPolicy, PollStrategy};
