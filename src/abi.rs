//! Contract ABIs used by the client
//!
//! Both ABIs are embedded as JSON; either can be replaced by a JSON ABI file
//! named in the configuration.

use alloy_json_abi::JsonAbi;
use std::path::Path;

use crate::config::AbiConfig;
use crate::error::{AirdropError, Result};

/// ERC-20 functions the client needs
pub const ERC20_ABI_JSON: &str = r#"[
  {
    "type": "function",
    "name": "symbol",
    "inputs": [],
    "outputs": [{ "name": "", "type": "string" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "decimals",
    "inputs": [],
    "outputs": [{ "name": "", "type": "uint8" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "balanceOf",
    "inputs": [{ "name": "account", "type": "address" }],
    "outputs": [{ "name": "", "type": "uint256" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "allowance",
    "inputs": [
      { "name": "owner", "type": "address" },
      { "name": "spender", "type": "address" }
    ],
    "outputs": [{ "name": "", "type": "uint256" }],
    "stateMutability": "view"
  },
  {
    "type": "function",
    "name": "approve",
    "inputs": [
      { "name": "spender", "type": "address" },
      { "name": "amount", "type": "uint256" }
    ],
    "outputs": [{ "name": "", "type": "bool" }],
    "stateMutability": "nonpayable"
  }
]"#;

/// Airdrop contract interface
pub const AIRDROP_ABI_JSON: &str = r#"[
  {
    "type": "function",
    "name": "airdropERC20",
    "inputs": [
      { "name": "tokenAddress", "type": "address" },
      { "name": "recipients", "type": "address[]" },
      { "name": "amounts", "type": "uint256[]" },
      { "name": "totalAmount", "type": "uint256" }
    ],
    "outputs": [],
    "stateMutability": "nonpayable"
  }
]"#;

pub const FN_SYMBOL: &str = "symbol";
pub const FN_DECIMALS: &str = "decimals";
pub const FN_BALANCE_OF: &str = "balanceOf";
pub const FN_ALLOWANCE: &str = "allowance";
pub const FN_APPROVE: &str = "approve";
pub const FN_AIRDROP: &str = "airdropERC20";

/// The pair of ABIs a submission needs
#[derive(Debug, Clone)]
pub struct Abis {
    /// Token ABI
    pub erc20: JsonAbi,
    /// Airdrop (spender) contract ABI
    pub airdrop: JsonAbi,
}

impl Abis {
    /// Embedded ABIs
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            erc20: parse_abi(ERC20_ABI_JSON)?,
            airdrop: parse_abi(AIRDROP_ABI_JSON)?,
        })
    }

    /// Embedded ABIs, with any file configured in `config` taking precedence
    pub async fn load(config: &AbiConfig) -> Result<Self> {
        let mut abis = Self::builtin()?;

        if let Some(path) = &config.erc20_path {
            abis.erc20 = load_abi(path).await?;
        }
        if let Some(path) = &config.airdrop_path {
            abis.airdrop = load_abi(path).await?;
        }

        for (abi, name) in [(&abis.erc20, FN_APPROVE), (&abis.erc20, FN_ALLOWANCE), (&abis.airdrop, FN_AIRDROP)] {
            if abi.function(name).is_none() {
                return Err(AirdropError::AbiLoad(format!("Function '{}' not found in ABI", name)));
            }
        }

        Ok(abis)
    }
}

fn parse_abi(json: &str) -> Result<JsonAbi> {
    serde_json::from_str(json)
        .map_err(|e| AirdropError::AbiLoad(format!("Failed to parse ABI: {}", e)))
}

/// Load ABI from JSON file
pub async fn load_abi(path: impl AsRef<Path>) -> Result<JsonAbi> {
    let path = path.as_ref();
    let abi_content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AirdropError::AbiLoad(format!("Failed to read ABI file {}: {}", path.display(), e)))?;

    parse_abi(&abi_content)
}
