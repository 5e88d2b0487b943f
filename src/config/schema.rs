//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the SDK.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::{PollPolicy, PollStrategy};
use crate::signer::AccountSpec;

/// Root configuration for the staking SDK.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Confirmation polling cadence.
    pub confirmation: ConfirmationConfig,

    /// Per-network settings.
    pub chains: Vec<ChainConfig>,

    /// Local signer accounts. The mnemonic itself is only read from the environment.
    pub signer: SignerConfig,
}

impl SdkConfig {
    /// Look up a chain by name.
    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Maximum number of status polls.
    pub max_attempts: u32,

    /// Delay between polls in milliseconds (base delay for backoff).
    pub delay_ms: u64,

    /// Upper bound on the delay when `strategy = "backoff"`.
    pub max_delay_ms: u64,

    /// `fixed` or `backoff`.
    pub strategy: PollStrategy,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 5_000,
            max_delay_ms: 60_000,
            strategy: PollStrategy::Fixed,
        }
    }
}

impl From<&ConfirmationConfig> for PollPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms.max(config.delay_ms)),
            strategy: config.strategy,
        }
    }
}

/// Network family, selecting which adapter serves a chain entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    #[default]
    Evm,
}

/// Per-network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Unique network name (e.g., "ethereum", "holesky").
    pub name: String,

    /// Adapter family.
    pub kind: ChainKind,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations before a receipt counts as success.
    pub confirmation_blocks: u32,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Gas limit for staking contract calls.
    pub gas_limit: u64,

    /// `"1"` followed by the token's decimals in zeros.
    pub denom_multiplier: String,

    /// Address of the staking pool contract.
    pub staking_contract: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: "ethereum".to_string(),
            kind: ChainKind::Evm,
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            confirmation_blocks: 3,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
            gas_limit: 300_000,
            denom_multiplier: "1000000000000000000".to_string(),
            staking_contract: String::new(),
        }
    }
}

/// Local signer configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Accounts to derive from the mnemonic.
    pub accounts: Vec<AccountSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.confirmation.max_attempts, 5);
        assert_eq!(config.confirmation.delay_ms, 5_000);
        assert!(config.chains.is_empty());

        let chain = ChainConfig::default();
        assert_eq!(chain.rpc_timeout_secs, 10);
        assert_eq!(chain.confirmation_blocks, 3);
    }

    #[test]
    fn test_poll_policy_from_config() {
        let config = ConfirmationConfig {
            max_attempts: 8,
            delay_ms: 2_000,
            max_delay_ms: 500,
            strategy: PollStrategy::Backoff,
        };
        let policy = PollPolicy::from(&config);
        assert_eq!(policy.max_attempts, 8);
        assert_eq!(policy.delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(2));
        assert_eq!(policy.strategy, PollStrategy::Backoff);
    }

    #[test]
    fn test_minimal_toml() {
        let config: SdkConfig = toml::from_str(
            r#"
            [[chains]]
            name = "holesky"
            chain_id = 17000
            staking_contract = "0x0000000000000000000000000000000000000abc"

            [[signer.accounts]]
            hd_path = "m/44'/60'/0'/0/0"
            key_type = "secp256k1"
            "#,
        )
        .unwrap();

        let chain = config.chain("holesky").unwrap();
        assert_eq!(chain.chain_id, 17000);
        assert_eq!(chain.kind, ChainKind::Evm);
        assert_eq!(chain.denom_multiplier, "1000000000000000000");
        assert_eq!(config.signer.accounts.len(), 1);
        assert!(config.chain("mainnet").is_none());
    }
}
