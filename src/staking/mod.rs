//! Stake position classification.
//!
//! # Data Flow
//! ```text
//! ChainAdapter::get_delegation_fact (epochs + stake)
//!     → state.rs (pure classification)
//!     → StakeState reported to caller
//! ```

pub mod state;

pub use state::{classify, classify_detailed, Delegation, DelegationFact, StakeState, EPOCH_NEVER};
