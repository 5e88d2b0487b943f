//! End-to-end lifecycle tests against a scripted chain adapter.

use std::time::Duration;

use alloy::primitives::U256;
use tokio::time::Instant;

use staking_sdk::amount::AmountError;
use staking_sdk::chain::{
    ChainError, ClaimRewardsParams, CompoundParams, DelegationQuery, StakeParams, StakingOperation,
    TxHash, TxStatus, ValidationError, WithdrawParams,
};
use staking_sdk::resilience::PollPolicy;
use staking_sdk::signer::{AccountSpec, LocalSigner, Signer, SignerError};
use staking_sdk::staking::{DelegationFact, StakeState, EPOCH_NEVER};
use staking_sdk::transaction::{LifecycleError, TransactionLifecycle};

mod common;

use common::{address, Poll, ScriptedAdapter, StubSigner};

const MNEMONIC: &str = "test test test test test test test test test test test junk";

fn lifecycle(adapter: ScriptedAdapter) -> TransactionLifecycle<ScriptedAdapter, StubSigner> {
    TransactionLifecycle::new(adapter, StubSigner::new(&[1]))
}

fn stake(amount: &str) -> StakingOperation {
    StakingOperation::Stake(StakeParams {
        delegator_address: address(1),
        validator_address: address(2),
        amount: amount.to_string(),
    })
}

fn assert_elapsed_between(start: Instant, lower_secs: u64, upper_secs: u64) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(lower_secs) && elapsed < Duration::from_secs(upper_secs),
        "elapsed {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_confirm_succeeds_on_third_poll() {
    let lc = lifecycle(ScriptedAdapter::new([TxStatus::Unknown, TxStatus::Unknown, TxStatus::Success]));
    let start = Instant::now();

    let confirmation = lc.confirm(&TxHash::from("0x01")).await.unwrap();

    assert_eq!(confirmation.tx_hash.as_str(), "0x01");
    assert_eq!(confirmation.attempts, 3);
    assert_eq!(lc.adapter().status_calls(), 3);
    // Two 5 s gaps between three polls.
    assert_elapsed_between(start, 10, 11);
}

#[tokio::test(start_paused = true)]
async fn test_confirm_times_out_after_budget() {
    let lc = lifecycle(ScriptedAdapter::new([]));
    let start = Instant::now();

    let err = lc.confirm(&TxHash::from("0x02")).await.unwrap_err();

    match err {
        LifecycleError::ConfirmationTimeout { tx_hash, attempts } => {
            assert_eq!(tx_hash.as_str(), "0x02");
            assert_eq!(attempts, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(lc.adapter().status_calls(), 5);
    // No delay after the last poll.
    assert_elapsed_between(start, 20, 21);
}

#[tokio::test(start_paused = true)]
async fn test_pending_is_retried() {
    let lc = lifecycle(ScriptedAdapter::new([TxStatus::Pending, TxStatus::Pending, TxStatus::Success]));
    let confirmation = lc.confirm(&TxHash::from("0x03")).await.unwrap();
    assert_eq!(confirmation.attempts, 3);
}

#[tokio::test(start_paused = true)]
async fn test_chain_failure_stops_polling() {
    let lc = lifecycle(ScriptedAdapter::new([TxStatus::Failure, TxStatus::Success]));
    let start = Instant::now();

    let err = lc.confirm(&TxHash::from("0x04")).await.unwrap_err();

    assert!(matches!(err, LifecycleError::ChainFailure { ref tx_hash } if tx_hash.as_str() == "0x04"));
    assert_eq!(lc.adapter().status_calls(), 1);
    assert_elapsed_between(start, 0, 1);
}

#[tokio::test(start_paused = true)]
async fn test_status_rpc_error_propagates() {
    let lc = lifecycle(ScriptedAdapter::with_polls([
        Poll::Status(TxStatus::Unknown),
        Poll::RpcError("node down"),
        Poll::Status(TxStatus::Success),
    ]));

    let err = lc.confirm(&TxHash::from("0x05")).await.unwrap_err();

    match err {
        LifecycleError::Status { tx_hash, source } => {
            assert_eq!(tx_hash.as_str(), "0x05");
            assert!(matches!(source, ChainError::Rpc(ref r) if r == "node down"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(lc.adapter().status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_execute_status_error_is_resumable() {
    let lc = lifecycle(ScriptedAdapter::with_polls([
        Poll::Status(TxStatus::Unknown),
        Poll::RpcError("node down"),
        Poll::Status(TxStatus::Success),
    ]));

    let err = lc.execute(&address(1), &stake("1")).await.unwrap_err();
    assert_eq!(lc.adapter().broadcasts(), 1);
    let tx_hash = err.tx_hash().cloned().expect("hash of the broadcast transaction");

    // Re-polling the same hash confirms without a second submission.
    let confirmation = lc.confirm(&tx_hash).await.unwrap();
    assert_eq!(confirmation.tx_hash, tx_hash);
    assert_eq!(confirmation.attempts, 1);
    assert_eq!(lc.adapter().broadcasts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy() {
    let lc = lifecycle(ScriptedAdapter::new([]))
        .with_policy(PollPolicy::fixed(2, Duration::from_secs(1)));
    let start = Instant::now();

    let err = lc.confirm(&TxHash::from("0x06")).await.unwrap_err();

    assert!(matches!(err, LifecycleError::ConfirmationTimeout { attempts: 2, .. }));
    assert_eq!(lc.adapter().status_calls(), 2);
    assert_elapsed_between(start, 1, 2);
}

#[tokio::test]
async fn test_build_rejects_bad_address_before_adapter() {
    let lc = lifecycle(ScriptedAdapter::new([]));
    let op = StakingOperation::Stake(StakeParams {
        delegator_address: "0OIl".to_string(),
        validator_address: address(2),
        amount: "1".to_string(),
    });

    let err = lc.build(&op).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Validation(ValidationError::Address { .. })));
    assert_eq!(lc.adapter().builds(), 0);
}

#[tokio::test]
async fn test_build_rejects_bad_amounts_before_adapter() {
    let lc = lifecycle(ScriptedAdapter::new([]));

    let err = lc.build(&stake("1.0000000001")).await.unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::Amount {
            source: AmountError::Precision { precision: 10, .. },
            ..
        })
    ));

    let err = lc.build(&stake("")).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(ValidationError::EmptyAmount)));

    let err = lc.build(&stake("-3")).await.unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::Amount {
            source: AmountError::Negative,
            ..
        })
    ));

    assert_eq!(lc.adapter().builds(), 0);
}

#[tokio::test]
async fn test_build_converts_amounts() {
    let lc = lifecycle(ScriptedAdapter::new([]));

    let tx = lc.build(&stake("1.5")).await.unwrap();
    assert_eq!(tx.operation, "stake");
    assert_eq!(tx.amount, Some(U256::from(1_500_000_000u64)));

    let withdraw_all = StakingOperation::Withdraw(WithdrawParams {
        delegator_address: address(1),
        validator_address: address(2),
        amount: None,
    });
    let tx = lc.build(&withdraw_all).await.unwrap();
    assert_eq!(tx.operation, "withdraw");
    assert_eq!(tx.amount, None);

    let claim = StakingOperation::ClaimRewards(ClaimRewardsParams {
        delegator_address: address(1),
        validator_address: address(2),
    });
    assert_eq!(lc.build(&claim).await.unwrap().operation, "claim_rewards");
    assert_eq!(lc.adapter().builds(), 3);
}

#[tokio::test]
async fn test_sign_looks_up_address_case_insensitively() {
    let lc = lifecycle(ScriptedAdapter::new([]));
    let tx = lc.build(&stake("2")).await.unwrap();

    let signed = lc.sign(&address(1).to_uppercase(), tx).await.unwrap();
    assert_eq!(signed.signature.len(), 64);
}

#[tokio::test]
async fn test_sign_with_unknown_account() {
    let lc = lifecycle(ScriptedAdapter::new([]));
    let tx = lc.build(&stake("2")).await.unwrap();

    let err = lc.sign(&address(7), tx).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Custody(SignerError::AccountNotFound(ref a)) if *a == address(7)));
    assert_eq!(err.to_string(), format!("no account found for address: {}", address(7)));
}

#[tokio::test]
async fn test_broadcast_is_not_retried() {
    let lc = lifecycle(ScriptedAdapter::new([TxStatus::Success]).rejecting_broadcasts("insufficient funds"));

    let err = lc.execute(&address(1), &stake("2")).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Broadcast(ChainError::Rejected(_))));
    assert_eq!(lc.adapter().broadcasts(), 1);
    assert_eq!(lc.adapter().status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_execute_runs_full_pipeline() {
    let lc = lifecycle(ScriptedAdapter::new([TxStatus::Pending, TxStatus::Success]));

    let confirmation = lc.execute(&address(1), &stake("0.25")).await.unwrap();

    assert_eq!(confirmation.attempts, 2);
    assert_eq!(lc.adapter().builds(), 1);
    assert_eq!(lc.adapter().broadcasts(), 1);
    assert_eq!(lc.signer().signed(), 1);

    let sent = lc.adapter().broadcast_log();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tx.amount, Some(U256::from(250_000_000u64)));
}

#[tokio::test(start_paused = true)]
async fn test_execute_with_local_signer() {
    let mut signer = LocalSigner::new(MNEMONIC, vec![AccountSpec::ed25519("m/44'/501'/0'/0'")]);
    signer.init().await.unwrap();
    let delegator = signer.addresses()[0].clone();

    let lc = TransactionLifecycle::new(ScriptedAdapter::new([TxStatus::Success]), signer);
    let op = StakingOperation::Compound(CompoundParams {
        delegator_address: delegator.clone(),
        validator_address: address(2),
    });

    let confirmation = lc.execute(&delegator, &op).await.unwrap();
    assert_eq!(confirmation.attempts, 1);
    assert_eq!(lc.adapter().broadcast_log()[0].tx.operation, "compound");
}

#[tokio::test]
async fn test_stake_state() {
    let query = DelegationQuery {
        delegator_address: address(1),
        validator_address: address(2),
    };
    let amount = U256::from(1_000u64);

    let cases = [
        (DelegationFact::undelegated(10), StakeState::Undelegated),
        (DelegationFact::new(10, 5, EPOCH_NEVER, amount), StakeState::Delegated),
        (DelegationFact::new(10, 5, 12, amount), StakeState::Deactivating),
        (DelegationFact::new(12, 5, 12, amount), StakeState::Undelegated),
    ];
    for (fact, expected) in cases {
        let lc = lifecycle(ScriptedAdapter::new([]).with_fact(fact.clone()));
        let report = lc.stake_state(&query).await.unwrap();
        assert_eq!(report.state, expected, "fact {:?}", fact);
        assert_eq!(report.fact, fact);
    }
}

#[tokio::test]
async fn test_stake_state_validates_query() {
    let lc = lifecycle(ScriptedAdapter::new([]));
    let query = DelegationQuery {
        delegator_address: address(1),
        validator_address: "short".to_string(),
    };
    let err = lc.stake_state(&query).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
}
