//! Delegation lifecycle state machine.
//!
//! # States
//! - Undelegated: nothing staked, or cooldown complete
//! - Activating: delegated but warm-up epoch not reached (detailed view only)
//! - Delegated: stake is active
//! - Deactivating: unstake requested, cooldown in flight
//!
//! # State Transitions
//! ```text
//! Undelegated → Activating:   delegation recorded for a future epoch
//! Activating → Delegated:     current_epoch >= activation_epoch
//! Delegated → Deactivating:   deactivation_epoch scheduled
//! Deactivating → Undelegated: current_epoch >= deactivation_epoch
//! ```
//!
//! Classification is a pure function of the latest `DelegationFact`; the
//! state is never stored.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Sentinel deactivation epoch meaning "never scheduled to deactivate".
pub const EPOCH_NEVER: u64 = u64::MAX;

/// On-chain delegation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub activation_epoch: u64,
    /// `EPOCH_NEVER` unless an unstake was requested.
    pub deactivation_epoch: u64,
    /// Staked amount in base units.
    pub stake: U256,
}

impl Delegation {
    pub fn is_deactivation_scheduled(&self) -> bool {
        self.deactivation_epoch != EPOCH_NEVER
    }
}

/// Snapshot fetched per query; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationFact {
    pub current_epoch: u64,
    /// `None` when the delegator never staked with this validator.
    pub delegation: Option<Delegation>,
}

impl DelegationFact {
    pub fn undelegated(current_epoch: u64) -> Self {
        Self {
            current_epoch,
            delegation: None,
        }
    }

    pub fn new(current_epoch: u64, activation_epoch: u64, deactivation_epoch: u64, stake: U256) -> Self {
        Self {
            current_epoch,
            delegation: Some(Delegation {
                activation_epoch,
                deactivation_epoch,
                stake,
            }),
        }
    }
}

/// Derived delegation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeState {
    Undelegated,
    Activating,
    Delegated,
    Deactivating,
}

impl std::fmt::Display for StakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StakeState::Undelegated => "undelegated",
            StakeState::Activating => "activating",
            StakeState::Delegated => "delegated",
            StakeState::Deactivating => "deactivating",
        };
        f.write_str(s)
    }
}

/// Classify a position in the four-state model.
///
/// A position still warming up reports `Delegated`; use
/// [`classify_detailed`] to see `Activating`.
pub fn classify(fact: &DelegationFact) -> StakeState {
    match classify_detailed(fact) {
        StakeState::Activating => StakeState::Delegated,
        state => state,
    }
}

/// Classify a position, distinguishing warm-up from active stake.
pub fn classify_detailed(fact: &DelegationFact) -> StakeState {
    let Some(delegation) = &fact.delegation else {
        return StakeState::Undelegated;
    };

    if !delegation.is_deactivation_scheduled() {
        return if fact.current_epoch >= delegation.activation_epoch {
            StakeState::Delegated
        } else {
            StakeState::Activating
        };
    }

    // Deactivation scheduled in the activation epoch still reads as
    // deactivating during that epoch.
    let same_epoch = delegation.activation_epoch == delegation.deactivation_epoch
        && fact.current_epoch <= delegation.deactivation_epoch;

    if same_epoch || fact.current_epoch < delegation.deactivation_epoch {
        StakeState::Deactivating
    } else {
        StakeState::Undelegated
    }
}
