//! Build, sign, broadcast and confirm staking transactions.
//!
//! # Responsibilities
//! - Validate caller input before any adapter call
//! - Drive one adapter and one signer through the pipeline
//! - Poll transaction status sequentially within the attempt budget
//! - Classify delegation facts on request

use std::time::Instant;

use tracing::Instrument;

use crate::chain::validation::validate_amount;
use crate::chain::{ChainAdapter, DelegationQuery, StakingOperation, TxHash, TxStatus, ValidationError};
use crate::observability::metrics::{self, ConfirmationOutcome};
use crate::observability::tracing::operation_span;
use crate::resilience::PollPolicy;
use crate::signer::{SignOptions, Signer};
use crate::staking::classify;
use crate::transaction::types::{Confirmation, LifecycleError, LifecycleResult, StakeReport};

/// Staking pipeline over one chain adapter and one signer.
pub struct TransactionLifecycle<A, S> {
    adapter: A,
    signer: S,
    policy: PollPolicy,
}

impl<A: ChainAdapter, S: Signer> TransactionLifecycle<A, S> {
    /// Create a lifecycle with the default poll policy (5 attempts, 5 s apart).
    pub fn new(adapter: A, signer: S) -> Self {
        Self {
            adapter,
            signer,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Check addresses and amount of `op` against the adapter's rules.
    pub fn validate(&self, op: &StakingOperation) -> Result<(), ValidationError> {
        let (delegator, validator) = op.addresses();
        self.adapter.validate_address(delegator)?;
        self.adapter.validate_address(validator)?;

        match op {
            StakingOperation::Stake(p) => validate_amount(&p.amount, self.adapter.denom_multiplier()),
            StakingOperation::Unstake(p) => validate_amount(&p.amount, self.adapter.denom_multiplier()),
            StakingOperation::Withdraw(p) => match &p.amount {
                Some(amount) => validate_amount(amount, self.adapter.denom_multiplier()),
                None => Ok(()),
            },
            StakingOperation::ClaimRewards(_) | StakingOperation::Compound(_) => Ok(()),
        }
    }

    /// Validate `op` and have the adapter construct its unsigned transaction.
    pub async fn build(&self, op: &StakingOperation) -> LifecycleResult<A::UnsignedTx> {
        self.validate(op)?;

        let tx = match op {
            StakingOperation::Stake(p) => self.adapter.build_stake_tx(p).await?,
            StakingOperation::Unstake(p) => self.adapter.build_unstake_tx(p).await?,
            StakingOperation::Withdraw(p) => self.adapter.build_withdraw_tx(p).await?,
            StakingOperation::ClaimRewards(p) => self.adapter.build_claim_rewards_tx(p).await?,
            StakingOperation::Compound(p) => self.adapter.build_compound_tx(p).await?,
        };

        metrics::record_tx_built(self.adapter.chain_name(), op.kind());
        tracing::debug!(
            chain = %self.adapter.chain_name(),
            operation = op.kind(),
            "Transaction built"
        );
        Ok(tx)
    }

    pub async fn sign(&self, signer_address: &str, tx: A::UnsignedTx) -> LifecycleResult<A::SignedTx> {
        self.sign_with(signer_address, tx, &SignOptions::default()).await
    }

    /// Sign `tx` with `signer_address`, passing `options` to the signer.
    pub async fn sign_with(
        &self,
        signer_address: &str,
        tx: A::UnsignedTx,
        options: &SignOptions,
    ) -> LifecycleResult<A::SignedTx> {
        let payload = self.adapter.signing_payload(&tx)?;
        let result = self.signer.sign(signer_address, &payload, options).await?;
        let signed = self.adapter.attach_signature(tx, &result)?;

        tracing::debug!(
            chain = %self.adapter.chain_name(),
            signer = %signer_address,
            "Transaction signed"
        );
        Ok(signed)
    }

    /// Submit once. A failed submission is reported, never resent.
    pub async fn broadcast(&self, tx: &A::SignedTx) -> LifecycleResult<TxHash> {
        let chain = self.adapter.chain_name();
        match self.adapter.broadcast(tx).await {
            Ok(tx_hash) => {
                metrics::record_broadcast(chain, true);
                tracing::info!(chain = %chain, tx_hash = %tx_hash, "Transaction broadcast");
                Ok(tx_hash)
            }
            Err(e) => {
                metrics::record_broadcast(chain, false);
                tracing::warn!(chain = %chain, error = %e, "Broadcast failed");
                Err(LifecycleError::Broadcast(e))
            }
        }
    }

    /// Poll until the chain reports a terminal status or the budget runs out.
    ///
    /// `Pending` and `Unknown` are both retried. Delays only separate
    /// attempts, so the last poll is followed directly by the timeout.
    /// Adapter errors end polling and carry the hash so the caller can resume.
    pub async fn confirm(&self, tx_hash: &TxHash) -> LifecycleResult<Confirmation> {
        let chain = self.adapter.chain_name();
        let started = Instant::now();

        for attempt in 1..=self.policy.max_attempts {
            let status = match self.adapter.get_tx_status(tx_hash).await {
                Ok(status) => status,
                Err(source) => {
                    tracing::warn!(chain = %chain, tx_hash = %tx_hash, attempt, error = %source, "Status query failed");
                    return Err(LifecycleError::Status {
                        tx_hash: tx_hash.clone(),
                        source,
                    });
                }
            };
            metrics::record_status_poll(chain, status);

            match status {
                TxStatus::Success => {
                    metrics::record_confirmation(chain, ConfirmationOutcome::Success);
                    tracing::info!(
                        chain = %chain,
                        tx_hash = %tx_hash,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Transaction confirmed"
                    );
                    return Ok(Confirmation {
                        tx_hash: tx_hash.clone(),
                        attempts: attempt,
                    });
                }
                TxStatus::Failure => {
                    metrics::record_confirmation(chain, ConfirmationOutcome::Failure);
                    tracing::warn!(chain = %chain, tx_hash = %tx_hash, attempt, "Transaction failed on chain");
                    return Err(LifecycleError::ChainFailure {
                        tx_hash: tx_hash.clone(),
                    });
                }
                TxStatus::Pending | TxStatus::Unknown => {
                    tracing::debug!(chain = %chain, tx_hash = %tx_hash, attempt, ?status, "Transaction not final");
                    if self.policy.has_remaining(attempt) {
                        tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        metrics::record_confirmation(chain, ConfirmationOutcome::Timeout);
        tracing::warn!(
            chain = %chain,
            tx_hash = %tx_hash,
            attempts = self.policy.max_attempts,
            "Transaction confirmation timed out"
        );
        Err(LifecycleError::ConfirmationTimeout {
            tx_hash: tx_hash.clone(),
            attempts: self.policy.max_attempts,
        })
    }

    /// Run the whole pipeline for `op`, signing with `signer_address`.
    pub async fn execute(&self, signer_address: &str, op: &StakingOperation) -> LifecycleResult<Confirmation> {
        let span = operation_span(self.adapter.chain_name(), op.kind());
        async {
            let unsigned = self.build(op).await?;
            let signed = self.sign(signer_address, unsigned).await?;
            let tx_hash = self.broadcast(&signed).await?;
            self.confirm(&tx_hash).await
        }
        .instrument(span)
        .await
    }

    /// Fetch the delegation fact for `query` and classify it.
    pub async fn stake_state(&self, query: &DelegationQuery) -> LifecycleResult<StakeReport> {
        self.adapter.validate_address(&query.delegator_address)?;
        self.adapter.validate_address(&query.validator_address)?;

        let fact = self.adapter.get_delegation_fact(query).await?;
        let state = classify(&fact);
        tracing::debug!(
            chain = %self.adapter.chain_name(),
            delegator = %query.delegator_address,
            validator = %query.validator_address,
            current_epoch = fact.current_epoch,
            state = %state,
            "Stake state classified"
        );
        Ok(StakeReport { fact, state })
    }
}
