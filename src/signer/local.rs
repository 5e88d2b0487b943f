//! Mnemonic-backed local signer.
//!
//! # Security
//! - The mnemonic is loaded from configuration or `STAKING_SDK_MNEMONIC`
//! - Derived keys stay inside the account table; only public keys leave it
//! - Debug output lists addresses only

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::{Bytes, B256};
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::signers::SignerSync;
use ed25519_dalek::Signer as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;

use crate::config::SignerConfig;
use crate::signer::types::{
    KeyType, SignOptions, SignResult, Signature, SignerData, SignerError, SignerResult,
};
use crate::signer::{normalize_address, Signer};

/// Environment variable name for the mnemonic.
pub const MNEMONIC_ENV_VAR: &str = "STAKING_SDK_MNEMONIC";

const HARDENED_OFFSET: u32 = 0x8000_0000;

type HmacSha512 = Hmac<Sha512>;

/// One account to derive during `init()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSpec {
    /// BIP-32 / SLIP-0010 derivation path, e.g. `m/44'/60'/0'/0/0`.
    pub hd_path: String,
    /// Curve to derive on.
    pub key_type: KeyType,
}

impl AccountSpec {
    pub fn secp256k1(hd_path: impl Into<String>) -> Self {
        Self {
            hd_path: hd_path.into(),
            key_type: KeyType::Secp256k1,
        }
    }

    pub fn ed25519(hd_path: impl Into<String>) -> Self {
        Self {
            hd_path: hd_path.into(),
            key_type: KeyType::Ed25519,
        }
    }
}

enum KeyHandle {
    Secp256k1(PrivateKeySigner),
    Ed25519(ed25519_dalek::SigningKey),
}

struct Account {
    hd_path: String,
    address: String,
    public_key: Vec<u8>,
    key: KeyHandle,
}

impl Account {
    fn key_type(&self) -> KeyType {
        match self.key {
            KeyHandle::Secp256k1(_) => KeyType::Secp256k1,
            KeyHandle::Ed25519(_) => KeyType::Ed25519,
        }
    }
}

/// Signer holding keys derived from a BIP-39 mnemonic.
///
/// Lookups lower-case the address, so base58 (ed25519) addresses are
/// case-folded too even though base58 itself is case-sensitive.
pub struct LocalSigner {
    mnemonic: Option<String>,
    specs: Vec<AccountSpec>,
    accounts: HashMap<String, Account>,
    /// Display addresses in derivation order.
    order: Vec<String>,
    initialized: bool,
}

impl LocalSigner {
    /// Create a signer for the given mnemonic and account paths.
    ///
    /// No derivation happens until `init()`.
    pub fn new(mnemonic: impl Into<String>, specs: Vec<AccountSpec>) -> Self {
        Self::with_mnemonic(Some(mnemonic.into()), specs)
    }

    /// Create a signer whose mnemonic comes from `STAKING_SDK_MNEMONIC`.
    ///
    /// A missing variable is reported by `init()`, not here.
    pub fn from_env(specs: Vec<AccountSpec>) -> Self {
        Self::with_mnemonic(std::env::var(MNEMONIC_ENV_VAR).ok(), specs)
    }

    /// Create a signer for the accounts listed in the `[signer]` config section.
    ///
    /// The mnemonic is never part of the file; it is read from `STAKING_SDK_MNEMONIC`.
    pub fn from_config(config: &SignerConfig) -> Self {
        Self::from_env(config.accounts.clone())
    }

    fn with_mnemonic(mnemonic: Option<String>, specs: Vec<AccountSpec>) -> Self {
        Self {
            mnemonic,
            specs,
            accounts: HashMap::new(),
            order: Vec::new(),
            initialized: false,
        }
    }

    /// Addresses derived by `init()`, in configuration order.
    pub fn addresses(&self) -> &[String] {
        &self.order
    }

    /// Derivation path that produced `address`.
    pub fn hd_path(&self, address: &str) -> SignerResult<&str> {
        self.account(address).map(|a| a.hd_path.as_str())
    }

    fn account(&self, address: &str) -> SignerResult<&Account> {
        if !self.initialized {
            return Err(SignerError::NotInitialized);
        }
        self.accounts
            .get(&normalize_address(address))
            .ok_or_else(|| SignerError::AccountNotFound(address.to_string()))
    }

    fn derive(mnemonic: &str, spec: &AccountSpec) -> SignerResult<Account> {
        match spec.key_type {
            KeyType::Secp256k1 => {
                let signer = MnemonicBuilder::<English>::default()
                    .phrase(mnemonic)
                    .derivation_path(&spec.hd_path)
                    .map_err(|e| {
                        SignerError::Setup(format!("Invalid derivation path '{}': {}", spec.hd_path, e))
                    })?
                    .build()
                    .map_err(|e| SignerError::Setup(format!("Key derivation failed: {}", e)))?;

                let public_key = signer
                    .credential()
                    .verifying_key()
                    .to_encoded_point(false)
                    .as_bytes()
                    .to_vec();

                Ok(Account {
                    hd_path: spec.hd_path.clone(),
                    address: signer.address().to_string(),
                    public_key,
                    key: KeyHandle::Secp256k1(signer),
                })
            }
            KeyType::Ed25519 => {
                let mnemonic = bip39::Mnemonic::parse_in(bip39::Language::English, mnemonic)
                    .map_err(|e| SignerError::Setup(format!("Invalid mnemonic: {}", e)))?;
                let seed = mnemonic.to_seed("");
                let secret = slip10_ed25519(&seed, &spec.hd_path)?;
                let key = ed25519_dalek::SigningKey::from_bytes(&secret);
                let public_key = key.verifying_key().to_bytes();

                Ok(Account {
                    hd_path: spec.hd_path.clone(),
                    address: bs58::encode(public_key).into_string(),
                    public_key: public_key.to_vec(),
                    key: KeyHandle::Ed25519(key),
                })
            }
        }
    }
}

impl Signer for LocalSigner {
    async fn init(&mut self) -> SignerResult<()> {
        let mnemonic = self.mnemonic.as_deref().ok_or_else(|| {
            SignerError::Setup(format!("Environment variable {} not set", MNEMONIC_ENV_VAR))
        })?;
        if self.specs.is_empty() {
            return Err(SignerError::Setup("No accounts configured".to_string()));
        }

        let mut accounts = HashMap::with_capacity(self.specs.len());
        let mut order = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            let account = Self::derive(mnemonic, spec)?;
            tracing::info!(
                address = %account.address,
                hd_path = %account.hd_path,
                key_type = ?spec.key_type,
                "Signer account derived"
            );
            order.push(account.address.clone());
            accounts.insert(normalize_address(&account.address), account);
        }

        self.accounts = accounts;
        self.order = order;
        self.initialized = true;
        Ok(())
    }

    async fn sign(
        &self,
        signer_address: &str,
        data: &SignerData,
        options: &SignOptions,
    ) -> SignerResult<SignResult> {
        let account = self.account(signer_address)?;
        let message = data.message.as_ref().ok_or(SignerError::MissingMessage)?;

        tracing::debug!(
            address = %account.address,
            key_type = ?account.key_type(),
            note = ?options.note,
            "Signing message"
        );

        let signature = match &account.key {
            KeyHandle::Secp256k1(signer) => {
                if message.len() != 32 {
                    return Err(SignerError::InvalidMessage {
                        key_type: KeyType::Secp256k1,
                        reason: format!("expected 32-byte hash, got {} bytes", message.len()),
                    });
                }
                let hash = B256::from_slice(message);
                let sig = signer
                    .sign_hash_sync(&hash)
                    .map_err(|e| SignerError::Signing(e.to_string()))?;

                Signature {
                    full_sig: Bytes::copy_from_slice(&sig.as_bytes()),
                    r: Some(B256::from(sig.r().to_be_bytes::<32>())),
                    s: Some(B256::from(sig.s().to_be_bytes::<32>())),
                    v: Some(27 + u8::from(sig.v())),
                }
            }
            KeyHandle::Ed25519(key) => {
                let sig = key.sign(message);
                Signature {
                    full_sig: Bytes::copy_from_slice(&sig.to_bytes()),
                    r: None,
                    s: None,
                    v: None,
                }
            }
        };

        Ok(SignResult {
            signature,
            public_key: Bytes::copy_from_slice(&account.public_key),
        })
    }

    async fn get_public_key(&self, address: &str) -> SignerResult<Vec<u8>> {
        self.account(address).map(|a| a.public_key.clone())
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("accounts", &self.order)
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// SLIP-0010 ed25519 derivation. Only hardened segments are defined.
fn slip10_ed25519(seed: &[u8], path: &str) -> SignerResult<[u8; 32]> {
    let indices = parse_hardened_path(path)?;

    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| SignerError::Setup(e.to_string()))?;
    mac.update(seed);
    let mut node = mac.finalize().into_bytes();

    for index in indices {
        let (key, chain_code) = node.split_at(32);
        let mut mac = HmacSha512::new_from_slice(chain_code)
            .map_err(|e| SignerError::Setup(e.to_string()))?;
        mac.update(&[0u8]);
        mac.update(key);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        node = mac.finalize().into_bytes();
    }

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&node[..32]);
    Ok(secret)
}

fn parse_hardened_path(path: &str) -> SignerResult<Vec<u32>> {
    let invalid = |reason: &str| SignerError::Setup(format!("Invalid derivation path '{}': {}", path, reason));

    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(invalid("must start with m"));
    }

    segments
        .map(|segment| {
            let digits = segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .ok_or_else(|| invalid("ed25519 supports hardened segments only"))?;
            let index: u32 = digits.parse().map_err(|_| invalid("segment is not a number"))?;
            if index >= HARDENED_OFFSET {
                return Err(invalid("segment out of range"));
            }
            Ok(index)
        })
        .collect()
}
