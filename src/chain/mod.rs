//! Chain adapter contract and reference adapters.
//!
//! # Data Flow
//! ```text
//! StakingOperation (addresses, macro amount)
//!     → validation.rs (address/amount shape, no I/O)
//!     → ChainAdapter::build_*_tx (amount → base units, wire construction)
//!     → signing_payload → Signer → attach_signature
//!     → broadcast → get_tx_status (polled by the lifecycle)
//! ```
//!
//! # Design Decisions
//! - One conforming adapter per network, chosen at construction time
//! - Adapters own all wire encoding; the lifecycle never inspects payloads
//! - Chain constants (multiplier, address family) live with the adapter

pub mod evm;
pub mod types;
pub mod validation;

use std::future::Future;

use crate::signer::{SignResult, SignerData};
use crate::staking::DelegationFact;

pub use types::{
    ChainError, ChainResult, ClaimRewardsParams, CompoundParams, DelegationQuery, StakeParams,
    StakingOperation, TxHash, TxStatus, UnstakeParams, WithdrawParams,
};
pub use validation::ValidationError;

/// Capability set a network integration provides.
pub trait ChainAdapter: Send + Sync {
    /// Chain-native unsigned transaction.
    type UnsignedTx: Send + Sync;
    /// Chain-native signed transaction, ready to submit.
    type SignedTx: Send + Sync;

    /// Network name for logs and metrics.
    fn chain_name(&self) -> &str;

    /// Scale factor between macro and base units, e.g. `"1000000000"`.
    fn denom_multiplier(&self) -> &str;

    /// Check an address against the network's address family.
    fn validate_address(&self, address: &str) -> Result<(), ValidationError>;

    fn build_stake_tx(
        &self,
        params: &StakeParams,
    ) -> impl Future<Output = ChainResult<Self::UnsignedTx>> + Send;

    fn build_unstake_tx(
        &self,
        params: &UnstakeParams,
    ) -> impl Future<Output = ChainResult<Self::UnsignedTx>> + Send;

    fn build_withdraw_tx(
        &self,
        params: &WithdrawParams,
    ) -> impl Future<Output = ChainResult<Self::UnsignedTx>> + Send;

    fn build_claim_rewards_tx(
        &self,
        params: &ClaimRewardsParams,
    ) -> impl Future<Output = ChainResult<Self::UnsignedTx>> + Send;

    fn build_compound_tx(
        &self,
        params: &CompoundParams,
    ) -> impl Future<Output = ChainResult<Self::UnsignedTx>> + Send;

    /// What the signer must sign for `tx`.
    fn signing_payload(&self, tx: &Self::UnsignedTx) -> ChainResult<SignerData>;

    /// Combine `tx` with a signature into a new signed value.
    fn attach_signature(&self, tx: Self::UnsignedTx, signed: &SignResult) -> ChainResult<Self::SignedTx>;

    /// Submit a signed transaction. Not retried.
    fn broadcast(&self, tx: &Self::SignedTx) -> impl Future<Output = ChainResult<TxHash>> + Send;

    fn get_tx_status(&self, tx_hash: &TxHash) -> impl Future<Output = ChainResult<TxStatus>> + Send;

    fn get_delegation_fact(
        &self,
        query: &DelegationQuery,
    ) -> impl Future<Output = ChainResult<DelegationFact>> + Send;
}
