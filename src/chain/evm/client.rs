//! EVM JSON-RPC client with failover and per-call timeouts.
//!
//! # Responsibilities
//! - Connect to the primary and failover JSON-RPC endpoints
//! - Query chain state (block number, nonce, gas price, receipts, calls)
//! - Submit raw transactions to the primary endpoint only
//! - Bound every call with the configured timeout

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{ChainError, ChainResult};
use crate::config::ChainConfig;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// RPC client wrapper with failover support.
#[derive(Clone)]
pub struct EvmClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl EvmClient {
    /// Create a new client.
    ///
    /// Chain ID verification failures are logged, not returned, so an
    /// unreachable node does not prevent construction.
    pub async fn new(config: ChainConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config,
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => tracing::info!(
                chain = %client.config.name,
                rpc_url = %client.config.rpc_url,
                chain_id = client.config.chain_id,
                "EVM client initialized"
            ),
            Err(e) => tracing::warn!(
                chain = %client.config.name,
                error = %e,
                "EVM client initialized but chain verification failed"
            ),
        }

        Ok(client)
    }

    /// Run `call` against each provider in order until one answers.
    async fn with_failover<T, F, Fut>(&self, what: &str, call: F) -> ChainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, what, "RPC error, trying next provider"),
                Err(_) => tracing::warn!(provider_idx = i, what, "RPC timeout, trying next provider"),
            }
        }
        Err(ChainError::Rpc(format!("All providers failed to {}", what)))
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let actual = self
            .with_failover("get chain id", |p| async move { p.get_chain_id().await })
            .await?;
        if actual != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }

    pub async fn get_block_number(&self) -> ChainResult<u64> {
        self.with_failover("get block number", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.with_failover("get transaction count", |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> ChainResult<u128> {
        self.with_failover("get gas price", |p| async move { p.get_gas_price().await })
            .await
    }

    pub async fn get_transaction_receipt(&self, tx_hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        self.with_failover("get receipt", |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Whether the node knows the transaction at all (mempool or mined).
    pub async fn is_transaction_known(&self, tx_hash: TxHash) -> ChainResult<bool> {
        self.with_failover("get transaction", |p| async move {
            p.get_transaction_by_hash(tx_hash).await.map(|tx| tx.is_some())
        })
        .await
    }

    /// Read-only contract call.
    pub async fn call(&self, to: Address, input: Bytes) -> ChainResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(input);
        self.with_failover("call contract", |p| {
            let request = request.clone();
            async move { p.call(request).await }
        })
        .await
    }

    /// Submit a raw signed transaction to the primary provider.
    ///
    /// Node errors are surfaced as `Rejected`; there is no failover here
    /// because a second submission is a retry.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> ChainResult<TxHash> {
        let primary = &self.providers[0];
        match timeout(self.timeout_duration, primary.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(ChainError::Rejected(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Check if the node is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Number of block confirmations required for success.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("chain", &self.config.name)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("providers", &self.providers.len())
            .finish()
    }
}
