//! Provider configuration and the Alloy-backed chain client

use alloy::rpc::types::TransactionReceipt;
use alloy_contract::{ContractInstance, Interface};
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::chain::{ContractReader, ContractWriter, ReceiptWaiter, TxReceipt};
use crate::config::RpcConfig;
use crate::error::{AirdropError, Result};

/// Provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL (HTTP)
    pub rpc_url: String,
    /// Give up waiting for a receipt after this many seconds
    pub receipt_timeout_seconds: u64,
    /// Delay between receipt polls
    pub poll_interval_ms: u64,
}

impl From<&RpcConfig> for ProviderConfig {
    fn from(rpc: &RpcConfig) -> Self {
        Self {
            rpc_url: rpc.url.clone(),
            receipt_timeout_seconds: rpc.receipt_timeout_seconds,
            poll_interval_ms: rpc.poll_interval_ms,
        }
    }
}

/// HTTP provider with a local signer, implementing every chain collaborator
pub struct ChainClient {
    config: ProviderConfig,
    provider: DynProvider,
    account: Address,
}

impl ChainClient {
    /// Create a client signing with `private_key`
    pub fn new(config: ProviderConfig, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| AirdropError::Configuration(format!("Invalid private key: {}", e)))?;
        let account = signer.address();
        let wallet = EthereumWallet::from(signer);

        let http_url: reqwest::Url = config
            .rpc_url
            .parse()
            .map_err(|e| AirdropError::Configuration(format!("Invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(http_url)
            .erased();

        Ok(Self {
            config,
            provider,
            account,
        })
    }

    /// The connected (signing) account
    pub fn account(&self) -> Address {
        self.account
    }

    /// Chain id reported by the node
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| AirdropError::Provider(format!("Failed to get chain id: {}", e)))
    }

    fn instance(&self, abi: &JsonAbi, address: Address) -> ContractInstance<DynProvider, Ethereum> {
        ContractInstance::new(address, self.provider.clone(), Interface::new(abi.clone()))
    }
}

#[async_trait]
impl ContractReader for ChainClient {
    async fn read(
        &self,
        abi: &JsonAbi,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>> {
        debug!("Calling {}.{}", address, function);
        let instance = self.instance(abi, address);
        let call = instance
            .function(function, args)
            .map_err(|e| AirdropError::Read(format!("Failed to create function call: {}", e)))?;

        call.call()
            .await
            .map_err(|e| AirdropError::Read(format!("Function call {} failed: {}", function, e)))
    }
}

#[async_trait]
impl ContractWriter for ChainClient {
    async fn write(
        &self,
        abi: &JsonAbi,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<TxHash> {
        let instance = self.instance(abi, address);
        let call = instance
            .function(function, args)
            .map_err(|e| AirdropError::Transaction(format!("Failed to create transaction: {}", e)))?;

        let pending_tx = call
            .send()
            .await
            .map_err(|e| AirdropError::Transaction(format!("{} failed: {}", function, e)))?;

        let tx_hash = *pending_tx.tx_hash();
        info!("Broadcast {}.{}: {}", address, function, tx_hash);
        Ok(tx_hash)
    }
}

#[async_trait]
impl ReceiptWaiter for ChainClient {
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let timeout = Duration::from_secs(self.config.receipt_timeout_seconds);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms.max(1));

        let polling = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => debug!("Receipt for {} not available yet", tx_hash),
                    Err(e) => {
                        return Err(AirdropError::Receipt(format!("Failed to get receipt: {}", e)))
                    }
                }
                tokio::time::sleep(poll_interval).await;
            }
        };

        let receipt = tokio::time::timeout(timeout, polling).await.map_err(|_| {
            AirdropError::Receipt(format!(
                "Timed out after {}s waiting for {}",
                self.config.receipt_timeout_seconds, tx_hash
            ))
        })??;

        Ok(to_receipt(&receipt))
    }
}

fn to_receipt(receipt: &TransactionReceipt) -> TxReceipt {
    TxReceipt {
        transaction_hash: ReceiptResponse::transaction_hash(receipt),
        block_number: ReceiptResponse::block_number(receipt),
        gas_used: ReceiptResponse::gas_used(receipt),
        success: ReceiptResponse::status(receipt),
    }
}
