//! Staking adapter for EVM staking-pool contracts.
//!
//! # Responsibilities
//! - Encode pool calls (`delegate`, `undelegate`, `withdraw`, `claimRewards`, `compound`)
//! - Build legacy EIP-155 transactions with nonce and gas price from the node
//! - Verify that attached signatures recover to the delegator
//! - Map receipts to `TxStatus` and `getDelegation` to `DelegationFact`

use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::amount::macro_to_denom_amount;
use crate::chain::evm::client::EvmClient;
use crate::chain::types::{
    ChainError, ChainResult, ClaimRewardsParams, CompoundParams, DelegationQuery, StakeParams, TxHash,
    TxStatus, UnstakeParams, WithdrawParams,
};
use crate::chain::validation::{validate_evm_address, ValidationError};
use crate::chain::ChainAdapter;
use crate::signer::{SignResult, SignerData};
use crate::staking::DelegationFact;

sol! {
    interface IStakingPool {
        function delegate(address validator) external payable;
        function undelegate(address validator, uint256 amount) external;
        function withdraw(address validator, uint256 amount) external;
        function claimRewards(address validator) external;
        function compound(address validator) external;
        function getDelegation(address delegator, address validator)
            external
            view
            returns (uint64 activationEpoch, uint64 deactivationEpoch, uint256 amount);
        function currentEpoch() external view returns (uint64);
    }
}

/// Unsigned pool transaction and the account expected to sign it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmUnsignedTx {
    pub from: Address,
    pub tx: TxLegacy,
}

/// Adapter for one EVM network's staking pool.
#[derive(Debug, Clone)]
pub struct EvmStakingAdapter {
    client: EvmClient,
    contract: Address,
}

impl EvmStakingAdapter {
    /// Create an adapter from a connected client.
    ///
    /// The pool address comes from the client's chain configuration.
    pub fn new(client: EvmClient) -> ChainResult<Self> {
        let contract = validate_evm_address(&client.config().staking_contract)?;
        Ok(Self { client, contract })
    }

    pub fn client(&self) -> &EvmClient {
        &self.client
    }

    fn parse_pair(&self, delegator: &str, validator: &str) -> ChainResult<(Address, Address)> {
        Ok((validate_evm_address(delegator)?, validate_evm_address(validator)?))
    }

    fn to_base_units(&self, amount: &str) -> ChainResult<U256> {
        Ok(macro_to_denom_amount(amount, &self.client.config().denom_multiplier)?)
    }

    /// Adjusted gas price in wei, refusing spikes above the configured cap.
    async fn gas_price(&self) -> ChainResult<u128> {
        let config = self.client.config();
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(ChainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }
        Ok((gas_price as f64 * config.gas_price_multiplier) as u128)
    }

    /// Build a pool call from `from` with the node's current nonce and gas price.
    async fn build_call(&self, from: Address, input: Vec<u8>, value: U256) -> ChainResult<EvmUnsignedTx> {
        let nonce = self.client.get_transaction_count(from).await?;
        let gas_price = self.gas_price().await?;
        Ok(self.assemble(from, nonce, gas_price, input, value))
    }

    fn assemble(&self, from: Address, nonce: u64, gas_price: u128, input: Vec<u8>, value: U256) -> EvmUnsignedTx {
        let config = self.client.config();
        EvmUnsignedTx {
            from,
            tx: TxLegacy {
                chain_id: Some(config.chain_id),
                nonce,
                gas_price,
                gas_limit: config.gas_limit,
                to: TxKind::Call(self.contract),
                value,
                input: Bytes::from(input),
            },
        }
    }
}

/// Recover an alloy signature from either the split or the packed form.
fn to_primitive_signature(signed: &SignResult) -> ChainResult<alloy::primitives::Signature> {
    let sig = &signed.signature;
    match (sig.r, sig.s, sig.v) {
        (Some(r), Some(s), Some(v)) => {
            let y_parity = match v {
                0 | 27 => false,
                1 | 28 => true,
                other => return Err(ChainError::Signature(format!("unsupported recovery id {}", other))),
            };
            Ok(alloy::primitives::Signature::new(
                U256::from_be_slice(r.as_slice()),
                U256::from_be_slice(s.as_slice()),
                y_parity,
            ))
        }
        _ => alloy::primitives::Signature::try_from(&sig.full_sig[..])
            .map_err(|e| ChainError::Signature(format!("expected 65-byte ECDSA signature: {}", e))),
    }
}

impl ChainAdapter for EvmStakingAdapter {
    type UnsignedTx = EvmUnsignedTx;
    type SignedTx = Signed<TxLegacy>;

    fn chain_name(&self) -> &str {
        &self.client.config().name
    }

    fn denom_multiplier(&self) -> &str {
        &self.client.config().denom_multiplier
    }

    fn validate_address(&self, address: &str) -> Result<(), ValidationError> {
        validate_evm_address(address).map(|_| ())
    }

    async fn build_stake_tx(&self, params: &StakeParams) -> ChainResult<EvmUnsignedTx> {
        let (from, validator) = self.parse_pair(&params.delegator_address, &params.validator_address)?;
        let value = self.to_base_units(&params.amount)?;
        let input = IStakingPool::delegateCall { validator }.abi_encode();
        self.build_call(from, input, value).await
    }

    async fn build_unstake_tx(&self, params: &UnstakeParams) -> ChainResult<EvmUnsignedTx> {
        let (from, validator) = self.parse_pair(&params.delegator_address, &params.validator_address)?;
        let amount = self.to_base_units(&params.amount)?;
        let input = IStakingPool::undelegateCall { validator, amount }.abi_encode();
        self.build_call(from, input, U256::ZERO).await
    }

    async fn build_withdraw_tx(&self, params: &WithdrawParams) -> ChainResult<EvmUnsignedTx> {
        let (from, validator) = self.parse_pair(&params.delegator_address, &params.validator_address)?;
        // Zero asks the pool for everything withdrawable.
        let amount = match &params.amount {
            Some(amount) => self.to_base_units(amount)?,
            None => U256::ZERO,
        };
        let input = IStakingPool::withdrawCall { validator, amount }.abi_encode();
        self.build_call(from, input, U256::ZERO).await
    }

    async fn build_claim_rewards_tx(&self, params: &ClaimRewardsParams) -> ChainResult<EvmUnsignedTx> {
        let (from, validator) = self.parse_pair(&params.delegator_address, &params.validator_address)?;
        let input = IStakingPool::claimRewardsCall { validator }.abi_encode();
        self.build_call(from, input, U256::ZERO).await
    }

    async fn build_compound_tx(&self, params: &CompoundParams) -> ChainResult<EvmUnsignedTx> {
        let (from, validator) = self.parse_pair(&params.delegator_address, &params.validator_address)?;
        let input = IStakingPool::compoundCall { validator }.abi_encode();
        self.build_call(from, input, U256::ZERO).await
    }

    fn signing_payload(&self, tx: &EvmUnsignedTx) -> ChainResult<SignerData> {
        // Rendered for signers that display the request instead of signing a bare hash.
        let data = serde_json::json!({
            "from": tx.from.to_string(),
            "to": self.contract.to_string(),
            "chain_id": tx.tx.chain_id,
            "nonce": tx.tx.nonce,
            "gas_price": tx.tx.gas_price.to_string(),
            "gas_limit": tx.tx.gas_limit,
            "value": tx.tx.value.to_string(),
            "input": tx.tx.input.to_string(),
        });
        Ok(SignerData::from_message(tx.tx.signature_hash().to_vec()).with_data(data))
    }

    fn attach_signature(&self, tx: EvmUnsignedTx, signed: &SignResult) -> ChainResult<Signed<TxLegacy>> {
        let signature = to_primitive_signature(signed)?;
        let hash = tx.tx.signature_hash();
        let recovered = signature
            .recover_address_from_prehash(&hash)
            .map_err(|e| ChainError::Signature(e.to_string()))?;
        if recovered != tx.from {
            return Err(ChainError::Signature(format!(
                "signature recovers to {}, expected {}",
                recovered, tx.from
            )));
        }
        Ok(tx.tx.into_signed(signature))
    }

    async fn broadcast(&self, tx: &Signed<TxLegacy>) -> ChainResult<TxHash> {
        let raw = TxEnvelope::from(tx.clone()).encoded_2718();
        let hash = self.client.send_raw_transaction(&raw).await?;
        Ok(TxHash::from(hash))
    }

    async fn get_tx_status(&self, tx_hash: &TxHash) -> ChainResult<TxStatus> {
        let hash: B256 = tx_hash
            .as_str()
            .parse()
            .map_err(|e| ChainError::Encoding(format!("invalid tx hash '{}': {}", tx_hash, e)))?;

        let Some(receipt) = self.client.get_transaction_receipt(hash).await? else {
            return if self.client.is_transaction_known(hash).await? {
                Ok(TxStatus::Pending)
            } else {
                Ok(TxStatus::Unknown)
            };
        };

        if !receipt.status() {
            return Ok(TxStatus::Failure);
        }

        let current_block = self.client.get_block_number().await?;
        let tx_block = receipt.block_number.unwrap_or(current_block);
        let confirmations = current_block.saturating_sub(tx_block);
        if confirmations < self.client.confirmation_blocks() as u64 {
            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations,
                required = self.client.confirmation_blocks(),
                "Waiting for confirmations"
            );
            return Ok(TxStatus::Pending);
        }
        Ok(TxStatus::Success)
    }

    async fn get_delegation_fact(&self, query: &DelegationQuery) -> ChainResult<DelegationFact> {
        let (delegator, validator) = self.parse_pair(&query.delegator_address, &query.validator_address)?;

        let epoch_raw = self
            .client
            .call(self.contract, IStakingPool::currentEpochCall {}.abi_encode().into())
            .await?;
        let current_epoch = IStakingPool::currentEpochCall::abi_decode_returns(&epoch_raw)
            .map_err(|e| ChainError::Encoding(e.to_string()))?;

        let raw = self
            .client
            .call(
                self.contract,
                IStakingPool::getDelegationCall { delegator, validator }.abi_encode().into(),
            )
            .await?;
        let record = IStakingPool::getDelegationCall::abi_decode_returns(&raw)
            .map_err(|e| ChainError::Encoding(e.to_string()))?;

        // The pool returns an all-zero record for unknown pairs.
        if record.amount.is_zero() && record.activationEpoch == 0 {
            return Ok(DelegationFact::undelegated(current_epoch));
        }

        Ok(DelegationFact::new(
            current_epoch,
            record.activationEpoch,
            record.deactivationEpoch,
            record.amount,
        ))
    }
}
