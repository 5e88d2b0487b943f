//! Shared collaborators for lifecycle integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use alloy::primitives::{keccak256, Bytes, U256};
use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};

use staking_sdk::amount::macro_to_denom_amount;
use staking_sdk::chain::validation::validate_base58_key;
use staking_sdk::chain::{
    ChainAdapter, ChainError, ChainResult, ClaimRewardsParams, CompoundParams, DelegationQuery,
    StakeParams, TxHash, TxStatus, UnstakeParams, ValidationError, WithdrawParams,
};
use staking_sdk::signer::{
    SignOptions, SignResult, Signature, Signer, SignerData, SignerError, SignerResult,
};
use staking_sdk::staking::DelegationFact;

/// Nine decimal places, as on most ed25519 networks.
pub const MULTIPLIER: &str = "1000000000";

/// Deterministic ed25519 key for `seed`.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

/// Base58 address of the key for `seed`.
pub fn address(seed: u8) -> String {
    bs58::encode(signing_key(seed).verifying_key().to_bytes()).into_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTx {
    pub operation: &'static str,
    pub delegator: String,
    pub amount: Option<U256>,
}

impl MockTx {
    fn digest(&self) -> Vec<u8> {
        let amount = self.amount.map(|a| a.to_string()).unwrap_or_default();
        keccak256(format!("{}:{}:{}", self.operation, self.delegator, amount)).to_vec()
    }
}

#[derive(Debug, Clone)]
pub struct MockSignedTx {
    pub tx: MockTx,
    pub signature: Bytes,
}

/// One scripted answer to a status poll.
pub enum Poll {
    Status(TxStatus),
    RpcError(&'static str),
}

/// Chain adapter answering from a script and counting calls.
pub struct ScriptedAdapter {
    polls: Mutex<VecDeque<Poll>>,
    fact: DelegationFact,
    broadcast_error: Option<String>,
    builds: AtomicU32,
    broadcasts: AtomicU32,
    status_calls: AtomicU32,
    broadcast_log: Mutex<Vec<MockSignedTx>>,
}

impl ScriptedAdapter {
    pub fn new(statuses: impl IntoIterator<Item = TxStatus>) -> Self {
        Self::with_polls(statuses.into_iter().map(Poll::Status))
    }

    pub fn with_polls(polls: impl IntoIterator<Item = Poll>) -> Self {
        Self {
            polls: Mutex::new(polls.into_iter().collect()),
            fact: DelegationFact::undelegated(0),
            broadcast_error: None,
            builds: AtomicU32::new(0),
            broadcasts: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            broadcast_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fact(mut self, fact: DelegationFact) -> Self {
        self.fact = fact;
        self
    }

    pub fn rejecting_broadcasts(mut self, reason: &str) -> Self {
        self.broadcast_error = Some(reason.to_string());
        self
    }

    pub fn builds(&self) -> u32 {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn broadcasts(&self) -> u32 {
        self.broadcasts.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn broadcast_log(&self) -> Vec<MockSignedTx> {
        self.broadcast_log.lock().unwrap().clone()
    }

    fn built(&self, operation: &'static str, delegator: &str, amount: Option<&str>) -> ChainResult<MockTx> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let amount = amount
            .map(|a| macro_to_denom_amount(a, MULTIPLIER))
            .transpose()?;
        Ok(MockTx {
            operation,
            delegator: delegator.to_string(),
            amount,
        })
    }
}

impl ChainAdapter for ScriptedAdapter {
    type UnsignedTx = MockTx;
    type SignedTx = MockSignedTx;

    fn chain_name(&self) -> &str {
        "scripted"
    }

    fn denom_multiplier(&self) -> &str {
        MULTIPLIER
    }

    fn validate_address(&self, address: &str) -> Result<(), ValidationError> {
        validate_base58_key(address).map(|_| ())
    }

    async fn build_stake_tx(&self, params: &StakeParams) -> ChainResult<MockTx> {
        self.built("stake", &params.delegator_address, Some(&params.amount))
    }

    async fn build_unstake_tx(&self, params: &UnstakeParams) -> ChainResult<MockTx> {
        self.built("unstake", &params.delegator_address, Some(&params.amount))
    }

    async fn build_withdraw_tx(&self, params: &WithdrawParams) -> ChainResult<MockTx> {
        self.built("withdraw", &params.delegator_address, params.amount.as_deref())
    }

    async fn build_claim_rewards_tx(&self, params: &ClaimRewardsParams) -> ChainResult<MockTx> {
        self.built("claim_rewards", &params.delegator_address, None)
    }

    async fn build_compound_tx(&self, params: &CompoundParams) -> ChainResult<MockTx> {
        self.built("compound", &params.delegator_address, None)
    }

    fn signing_payload(&self, tx: &MockTx) -> ChainResult<SignerData> {
        Ok(SignerData::from_message(tx.digest()))
    }

    fn attach_signature(&self, tx: MockTx, signed: &SignResult) -> ChainResult<MockSignedTx> {
        let key_bytes: [u8; 32] = signed.public_key[..]
            .try_into()
            .map_err(|_| ChainError::Signature("expected 32-byte public key".into()))?;
        let key = VerifyingKey::from_bytes(&key_bytes).map_err(|e| ChainError::Signature(e.to_string()))?;
        let sig = ed25519_dalek::Signature::from_slice(&signed.signature.full_sig)
            .map_err(|e| ChainError::Signature(e.to_string()))?;
        key.verify(&tx.digest(), &sig)
            .map_err(|e| ChainError::Signature(e.to_string()))?;

        Ok(MockSignedTx {
            tx,
            signature: signed.signature.full_sig.clone(),
        })
    }

    async fn broadcast(&self, tx: &MockSignedTx) -> ChainResult<TxHash> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.broadcast_error {
            return Err(ChainError::Rejected(reason.clone()));
        }
        self.broadcast_log.lock().unwrap().push(tx.clone());
        Ok(TxHash::from(keccak256(&tx.signature)))
    }

    async fn get_tx_status(&self, _tx_hash: &TxHash) -> ChainResult<TxStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        // An exhausted script keeps answering `Unknown`.
        let next = self.polls.lock().unwrap().pop_front();
        match next {
            Some(Poll::Status(status)) => Ok(status),
            Some(Poll::RpcError(reason)) => Err(ChainError::Rpc(reason.to_string())),
            None => Ok(TxStatus::Unknown),
        }
    }

    async fn get_delegation_fact(&self, _query: &DelegationQuery) -> ChainResult<DelegationFact> {
        Ok(self.fact.clone())
    }
}

/// In-memory ed25519 signer keyed by lower-cased address.
pub struct StubSigner {
    keys: HashMap<String, SigningKey>,
    signed: AtomicU32,
}

impl StubSigner {
    pub fn new(seeds: &[u8]) -> Self {
        let keys = seeds
            .iter()
            .map(|&seed| (address(seed).to_lowercase(), signing_key(seed)))
            .collect();
        Self {
            keys,
            signed: AtomicU32::new(0),
        }
    }

    pub fn signed(&self) -> u32 {
        self.signed.load(Ordering::SeqCst)
    }

    fn key(&self, address: &str) -> SignerResult<&SigningKey> {
        self.keys
            .get(&address.to_lowercase())
            .ok_or_else(|| SignerError::AccountNotFound(address.to_string()))
    }
}

impl Signer for StubSigner {
    async fn init(&mut self) -> SignerResult<()> {
        Ok(())
    }

    async fn sign(
        &self,
        signer_address: &str,
        data: &SignerData,
        _options: &SignOptions,
    ) -> SignerResult<SignResult> {
        let key = self.key(signer_address)?;
        let message = data.message.as_ref().ok_or(SignerError::MissingMessage)?;
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(SignResult {
            signature: Signature {
                full_sig: Bytes::copy_from_slice(&key.sign(message).to_bytes()),
                r: None,
                s: None,
                v: None,
            },
            public_key: Bytes::copy_from_slice(&key.verifying_key().to_bytes()),
        })
    }

    async fn get_public_key(&self, address: &str) -> SignerResult<Vec<u8>> {
        self.key(address).map(|k| k.verifying_key().to_bytes().to_vec())
    }
}
