//! Signer request/response types and error definitions.

use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload handed to a signer.
///
/// Raw-curve signers consume `message` (already hashed where the scheme
/// expects a prehash). Signers that must render a human-readable document,
/// such as hardware wallets, consume the chain-specific `data` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerData {
    /// Fully hashed message bytes.
    pub message: Option<Bytes>,
    /// Chain-specific structured payload.
    pub data: Option<serde_json::Value>,
}

impl SignerData {
    /// Payload carrying only a prehashed message.
    pub fn from_message(message: impl Into<Bytes>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
        }
    }

    /// Attach a structured payload alongside the message.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Per-call signing options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignOptions {
    /// Free-form note shown by signers that present requests to a human.
    pub note: Option<String>,
}

/// Signature produced by a signer.
///
/// `r`, `s` and `v` are only set by ECDSA schemes that support public key
/// recovery. `full_sig` is always the encoding a broadcaster should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub full_sig: Bytes,
    pub r: Option<B256>,
    pub s: Option<B256>,
    pub v: Option<u8>,
}

/// Result of a successful signing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResult {
    pub signature: Signature,
    pub public_key: Bytes,
}

/// Curve used by a derived account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Secp256k1,
    Ed25519,
}

/// Errors raised by signers.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Required secrets are missing or key derivation failed.
    #[error("signer setup failed: {0}")]
    Setup(String),

    /// Address was not derived during `init()`.
    #[error("no account found for address: {0}")]
    AccountNotFound(String),

    /// Neither a message nor the required structured data was supplied.
    #[error("missing message to sign")]
    MissingMessage,

    /// Message has the wrong shape for the account's scheme.
    #[error("invalid message for {key_type:?} signing: {reason}")]
    InvalidMessage { key_type: KeyType, reason: String },

    /// The underlying key or device failed to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),

    /// `sign` or `get_public_key` called before `init()`.
    #[error("signer not initialized")]
    NotInitialized,
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;
