//! Multi-chain staking SDK core.
//!
//! Amount conversion, key custody, stake state classification and the
//! build → sign → broadcast → confirm transaction lifecycle, shared by every
//! chain adapter.

pub mod amount;
pub mod chain;
pub mod config;
pub mod observability;
pub mod resilience;
pub mod signer;
pub mod staking;
pub mod transaction;

pub use amount::{denom_to_macro_amount, macro_to_denom_amount, AmountError};
pub use chain::{ChainAdapter, StakingOperation, TxHash, TxStatus};
pub use config::SdkConfig;
pub use resilience::PollPolicy;
pub use signer::{LocalSigner, Signer};
pub use staking::{classify, StakeState};
pub use transaction::{Confirmation, LifecycleError, TransactionLifecycle};
