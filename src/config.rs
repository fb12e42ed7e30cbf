use serde::Deserialize;
use std::path::Path;

use crate::error::{AirdropError, Result};
use crate::networks::NetworkEntry;

const DEFAULT_CONFIG_FILE: &str = "airdrop";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub abi: AbiConfig,
    #[serde(default)]
    pub networks: Vec<NetworkEntry>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub receipt_timeout_seconds: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding the persisted form fields
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbiConfig {
    pub erc20_path: Option<String>,
    pub airdrop_path: Option<String>,
}

impl Config {
    /// Defaults, then `airdrop.{toml,yaml,json}` (or `path`), then `AIRDROP__*`
    /// environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config_builder = config::Config::builder()
            .set_default("rpc.url", "http://localhost:8545")?
            .set_default("rpc.receipt_timeout_seconds", 120)?
            .set_default("rpc.poll_interval_ms", 1000)?
            .set_default("store.path", ".airdrop-form.json")?
            .set_default("log_level", "info")?
            .add_source(file_source)
            // AIRDROP__RPC__URL, AIRDROP__WALLET__PRIVATE_KEY, ...
            .add_source(config::Environment::with_prefix("AIRDROP").prefix_separator("__").separator("__"))
            .build()?;

        let config: Config = config_builder.try_deserialize()?;
        Ok(config)
    }
}

impl From<config::ConfigError> for AirdropError {
    fn from(e: config::ConfigError) -> Self {
        AirdropError::Configuration(e.to_string())
    }
}
