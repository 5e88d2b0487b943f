//! Lifecycle results and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{ChainError, TxHash, ValidationError};
use crate::signer::SignerError;
use crate::staking::{DelegationFact, StakeState};

/// Errors surfaced by the transaction lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Caller input rejected before any adapter call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Signer failure, passed through unchanged.
    #[error(transparent)]
    Custody(#[from] SignerError),

    /// Submission failed. Never retried.
    #[error("broadcast failed: {0}")]
    Broadcast(#[source] ChainError),

    /// No terminal status within the attempt budget.
    #[error("transaction {tx_hash} not confirmed after {attempts} attempts")]
    ConfirmationTimeout { tx_hash: TxHash, attempts: u32 },

    /// The chain reported the transaction as failed.
    #[error("transaction {tx_hash} failed on chain")]
    ChainFailure { tx_hash: TxHash },

    /// Status query failed after broadcast. Poll `tx_hash` again; do not resubmit.
    #[error("status query for transaction {tx_hash} failed: {source}")]
    Status {
        tx_hash: TxHash,
        #[source]
        source: ChainError,
    },

    /// Any other adapter error (build, payload, delegation query).
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl LifecycleError {
    /// Hash of the submitted transaction, when the error happened after broadcast.
    pub fn tx_hash(&self) -> Option<&TxHash> {
        match self {
            LifecycleError::ConfirmationTimeout { tx_hash, .. }
            | LifecycleError::ChainFailure { tx_hash }
            | LifecycleError::Status { tx_hash, .. } => Some(tx_hash),
            _ => None,
        }
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// A transaction observed as successful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    /// Status polls spent, including the one that saw success.
    pub attempts: u32,
}

/// Classified delegation together with the fact it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeReport {
    pub fact: DelegationFact,
    pub state: StakeState,
}
