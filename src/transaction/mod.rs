//! Transaction lifecycle.
//!
//! # Data Flow
//! ```text
//! StakingOperation
//!     → build (validation, adapter construction)   Built(UnsignedTx)
//!     → sign (payload → Signer → attach)            Signed(SignedTx)
//!     → broadcast (single submission)               Broadcast(TxHash)
//!     → confirm (sequential status polls)           Confirmed / Failed / TimedOut
//! ```
//!
//! # Design Decisions
//! - Each stage consumes the previous stage's value; no stage can be skipped
//! - Broadcast is never retried, only status polling is
//! - Polls are strictly sequential with delays only between attempts

pub mod lifecycle;
pub mod types;

pub use lifecycle::TransactionLifecycle;
pub use types::{Confirmation, LifecycleError, LifecycleResult, StakeReport};
