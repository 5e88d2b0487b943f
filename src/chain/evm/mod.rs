//! Reference adapter for EVM networks.
//!
//! # Data Flow
//! ```text
//! ChainConfig (RPC URLs, chain id, pool address)
//!     → client.rs (RPC connection with failover + timeouts)
//!     → adapter.rs (pool call encoding, legacy tx, receipts)
//! ```

pub mod adapter;
pub mod client;

pub use adapter::{EvmStakingAdapter, EvmUnsignedTx};
pub use client::EvmClient;
