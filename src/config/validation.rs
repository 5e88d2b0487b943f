//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts > 0, timeouts > 0)
//! - Check chain entries (unique names, parseable URLs, multiplier shape)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use crate::amount::denom_to_macro_amount;
use crate::chain::validation::validate_evm_address;
use crate::config::schema::{ChainConfig, ChainKind, SdkConfig};

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.confirmation.max_attempts == 0 {
        errors.push(ValidationError::new(
            "confirmation.max_attempts",
            "must be at least 1",
        ));
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    let mut names = HashSet::new();
    for (i, chain) in config.chains.iter().enumerate() {
        if !names.insert(chain.name.as_str()) {
            errors.push(ValidationError::new(
                format!("chains[{}].name", i),
                format!("duplicate chain name '{}'", chain.name),
            ));
        }
        validate_chain(i, chain, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_chain(i: usize, chain: &ChainConfig, errors: &mut Vec<ValidationError>) {
    let field = |name: &str| format!("chains[{}].{}", i, name);

    if chain.name.is_empty() {
        errors.push(ValidationError::new(field("name"), "must not be empty"));
    }

    for (key, url) in std::iter::once(("rpc_url", &chain.rpc_url))
        .chain(chain.failover_urls.iter().map(|u| ("failover_urls", u)))
    {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::new(field(key), format!("invalid URL '{}': {}", url, e)));
        }
    }

    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(field("rpc_timeout_secs"), "must be greater than 0"));
    }

    if !(chain.gas_price_multiplier.is_finite() && chain.gas_price_multiplier >= 1.0) {
        errors.push(ValidationError::new(
            field("gas_price_multiplier"),
            "must be a finite value >= 1.0",
        ));
    }

    if let Err(e) = denom_to_macro_amount(alloy::primitives::U256::ZERO, &chain.denom_multiplier) {
        errors.push(ValidationError::new(field("denom_multiplier"), e.to_string()));
    }

    match chain.kind {
        ChainKind::Evm => {
            if let Err(e) = validate_evm_address(&chain.staking_contract) {
                errors.push(ValidationError::new(field("staking_contract"), e.to_string()));
            }
        }
    }
}
