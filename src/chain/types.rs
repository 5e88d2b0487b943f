//! Chain-agnostic staking types and adapter error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::AmountError;
use crate::chain::validation::ValidationError;

/// Chain-native transaction hash, kept in its display encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

impl From<&str> for TxHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

impl From<alloy::primitives::TxHash> for TxHash {
    fn from(hash: alloy::primitives::TxHash) -> Self {
        Self(hash.to_string())
    }
}

/// Transaction status as reported by a chain.
///
/// `Unknown` means "not yet observable", never "rejected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failure,
    Pending,
    Unknown,
}

impl TxStatus {
    /// Whether polling can stop at this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Success | TxStatus::Failure)
    }
}

/// Parameters for delegating stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeParams {
    pub delegator_address: String,
    pub validator_address: String,
    /// Human decimal amount, e.g. `"1.5"`.
    pub amount: String,
}

/// Parameters for requesting an unstake (starts the cooldown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeParams {
    pub delegator_address: String,
    pub validator_address: String,
    pub amount: String,
}

/// Parameters for withdrawing stake whose cooldown completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawParams {
    pub delegator_address: String,
    pub validator_address: String,
    /// `None` withdraws everything withdrawable.
    pub amount: Option<String>,
}

/// Parameters for claiming accrued rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRewardsParams {
    pub delegator_address: String,
    pub validator_address: String,
}

/// Parameters for restaking accrued rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundParams {
    pub delegator_address: String,
    pub validator_address: String,
}

/// Delegation lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationQuery {
    pub delegator_address: String,
    pub validator_address: String,
}

/// A staking action to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum StakingOperation {
    Stake(StakeParams),
    Unstake(UnstakeParams),
    Withdraw(WithdrawParams),
    ClaimRewards(ClaimRewardsParams),
    Compound(CompoundParams),
}

impl StakingOperation {
    /// Operation name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StakingOperation::Stake(_) => "stake",
            StakingOperation::Unstake(_) => "unstake",
            StakingOperation::Withdraw(_) => "withdraw",
            StakingOperation::ClaimRewards(_) => "claim_rewards",
            StakingOperation::Compound(_) => "compound",
        }
    }

    /// `(delegator, validator)` addresses.
    pub fn addresses(&self) -> (&str, &str) {
        let (d, v) = match self {
            StakingOperation::Stake(p) => (&p.delegator_address, &p.validator_address),
            StakingOperation::Unstake(p) => (&p.delegator_address, &p.validator_address),
            StakingOperation::Withdraw(p) => (&p.delegator_address, &p.validator_address),
            StakingOperation::ClaimRewards(p) => (&p.delegator_address, &p.validator_address),
            StakingOperation::Compound(p) => (&p.delegator_address, &p.validator_address),
        };
        (d.as_str(), v.as_str())
    }

    /// Amount carried by the operation, if any.
    pub fn amount(&self) -> Option<&str> {
        match self {
            StakingOperation::Stake(p) => Some(&p.amount),
            StakingOperation::Unstake(p) => Some(&p.amount),
            StakingOperation::Withdraw(p) => p.amount.as_deref(),
            StakingOperation::ClaimRewards(_) | StakingOperation::Compound(_) => None,
        }
    }
}

/// Errors raised by chain adapters.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Node refused the signed transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Transaction or call data could not be encoded/decoded.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Signature does not fit the transaction.
    #[error("Signature error: {0}")]
    Signature(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for adapter operations.
pub type ChainResult<T> = Result<T, ChainError>;
