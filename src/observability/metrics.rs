//! Staking pipeline metrics.
//!
//! # Metrics
//! - `staking_tx_built_total` (counter): built transactions by chain, operation
//! - `staking_tx_broadcast_total` (counter): submissions by chain, result
//! - `staking_status_polls_total` (counter): status polls by chain, status
//! - `staking_tx_confirmations_total` (counter): terminal outcomes by chain, outcome

use crate::chain::TxStatus;

/// Terminal result of a confirmation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Success,
    Failure,
    Timeout,
}

impl ConfirmationOutcome {
    fn as_str(self) -> &'static str {
        match self {
            ConfirmationOutcome::Success => "success",
            ConfirmationOutcome::Failure => "failure",
            ConfirmationOutcome::Timeout => "timeout",
        }
    }
}

fn status_label(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Success => "success",
        TxStatus::Failure => "failure",
        TxStatus::Pending => "pending",
        TxStatus::Unknown => "unknown",
    }
}

pub fn record_tx_built(chain: &str, operation: &'static str) {
    ::metrics::counter!(
        "staking_tx_built_total",
        "chain" => chain.to_string(),
        "operation" => operation
    )
    .increment(1);
}

pub fn record_broadcast(chain: &str, accepted: bool) {
    let result = if accepted { "accepted" } else { "rejected" };
    ::metrics::counter!(
        "staking_tx_broadcast_total",
        "chain" => chain.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_status_poll(chain: &str, status: TxStatus) {
    ::metrics::counter!(
        "staking_status_polls_total",
        "chain" => chain.to_string(),
        "status" => status_label(status)
    )
    .increment(1);
}

pub fn record_confirmation(chain: &str, outcome: ConfirmationOutcome) {
    ::metrics::counter!(
        "staking_tx_confirmations_total",
        "chain" => chain.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
