//! Key custody and signing.
//!
//! # Data Flow
//! ```text
//! Mnemonic / device / remote custody
//!     → init() (derive accounts, keyed by lower-cased address)
//!     → sign(address, SignerData) → Signature + public key
//!     → chain adapter attaches the signature to the unsigned tx
//! ```
//!
//! # Security Constraints
//! - Private keys never leave a signer; only signatures and public keys do
//! - Key material is never logged or serialized
//! - Address lookup is case-insensitive
//!
//! # Variants
//! - `local.rs`: mnemonic-backed accounts (secp256k1 and ed25519)
//! - `serialized.rs`: wrapper for signers backed by one physical device

pub mod local;
pub mod serialized;
pub mod types;

use std::future::Future;

pub use local::{AccountSpec, LocalSigner};
pub use serialized::SerializedSigner;
pub use types::{KeyType, SignOptions, SignResult, Signature, SignerData, SignerError, SignerResult};

/// Capability contract every key custody backend satisfies.
///
/// Transaction construction never depends on which variant is in use, which
/// lets tests substitute a stub.
pub trait Signer: Send + Sync {
    /// Derive or connect accounts. Call once before signing.
    fn init(&mut self) -> impl Future<Output = SignerResult<()>> + Send;

    /// Sign `data` with the account behind `signer_address`.
    fn sign(
        &self,
        signer_address: &str,
        data: &SignerData,
        options: &SignOptions,
    ) -> impl Future<Output = SignerResult<SignResult>> + Send;

    /// Raw public key bytes of a previously derived address.
    fn get_public_key(&self, address: &str) -> impl Future<Output = SignerResult<Vec<u8>>> + Send;
}

/// Lookup key for account tables.
pub(crate) fn normalize_address(address: &str) -> String {
    address.to_lowercase()
}
