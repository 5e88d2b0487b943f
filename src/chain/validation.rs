//! Input validation run before any wire construction.
//!
//! # Responsibilities
//! - Address well-formedness per address family
//! - Amount presence and convertibility for the chain's multiplier
//!
//! Validation is pure; failures never reach an RPC endpoint.

use alloy::primitives::Address;
use thiserror::Error;

use crate::amount::{macro_to_denom_amount, AmountError};

/// Malformed caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("amount is required")]
    EmptyAmount,

    #[error("invalid amount '{amount}': {source}")]
    Amount {
        amount: String,
        #[source]
        source: AmountError,
    },
}

impl ValidationError {
    fn address(address: &str, reason: impl Into<String>) -> Self {
        Self::Address {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

/// `0x` followed by 40 hex digits; mixed-case input must carry a valid EIP-55 checksum.
pub fn validate_evm_address(address: &str) -> Result<Address, ValidationError> {
    let hex = address
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::address(address, "missing 0x prefix"))?;
    if hex.len() != 40 {
        return Err(ValidationError::address(
            address,
            format!("expected 40 hex characters, got {}", hex.len()),
        ));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::address(address, "non-hex character"));
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(address, None)
            .map_err(|_| ValidationError::address(address, "checksum mismatch"));
    }

    address
        .parse::<Address>()
        .map_err(|e| ValidationError::address(address, e.to_string()))
}

/// Base58 encoding of a 32-byte public key (ed25519 chains).
pub fn validate_base58_key(address: &str) -> Result<[u8; 32], ValidationError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| ValidationError::address(address, e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ValidationError::address(address, format!("expected 32 bytes, got {}", b.len())))
}

/// Non-empty amount that converts under `denom_multiplier`.
pub fn validate_amount(amount: &str, denom_multiplier: &str) -> Result<(), ValidationError> {
    if amount.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }
    macro_to_denom_amount(amount, denom_multiplier)
        .map(|_| ())
        .map_err(|source| ValidationError::Amount {
            amount: amount.to_string(),
            source,
        })
}
