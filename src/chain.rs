//! Chain collaborators the submission controller depends on
//!
//! Reads, writes and receipt waits are separate seams so tests can script
//! each one independently.

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AirdropError, Result};

/// Read-only contract call
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn read(
        &self,
        abi: &JsonAbi,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>>;
}

/// State-changing contract call; returns once the transaction is broadcast
#[async_trait]
pub trait ContractWriter: Send + Sync {
    async fn write(
        &self,
        abi: &JsonAbi,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<TxHash>;
}

/// Suspends until a transaction is finalized. Timeouts are enforced here.
#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt>;
}

/// Finalized transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

impl TxReceipt {
    /// Turn a reverted receipt into an error
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(AirdropError::Receipt(format!(
                "Transaction {} reverted",
                self.transaction_hash
            )))
        }
    }
}

/// Helper functions for decoding returned values
pub mod value_helpers {
    use super::*;

    /// First returned value
    pub fn first(values: &[DynSolValue]) -> Result<&DynSolValue> {
        values
            .first()
            .ok_or_else(|| AirdropError::Decoding("Empty return data".to_string()))
    }

    /// Convert DynSolValue to U256
    pub fn as_uint(value: &DynSolValue) -> Result<U256> {
        value
            .as_uint()
            .map(|(v, _)| v)
            .ok_or_else(|| AirdropError::Decoding("Expected uint value".to_string()))
    }

    /// Convert DynSolValue to u8, as returned by `decimals()`
    pub fn as_u8(value: &DynSolValue) -> Result<u8> {
        let value = as_uint(value)?;
        u8::try_from(value)
            .map_err(|_| AirdropError::Decoding(format!("Value {} does not fit in uint8", value)))
    }

    /// Convert DynSolValue to String
    pub fn as_string(value: &DynSolValue) -> Result<String> {
        value
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AirdropError::Decoding("Expected string value".to_string()))
    }
}
