//! Chain id to airdrop contract resolution

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{AirdropError, Result};

/// Known airdrop contract deployments: (chain id, network name, contract)
const BUILTIN_DEPLOYMENTS: &[(u64, &str, &str)] = &[
    (1, "mainnet", "0x3aD9F29AB266E4828450B33df7a9B9D7355Cd821"),
    (10, "optimism", "0xAaf523DF9455cC7B6ca5637D01624BC00a5e9fAa"),
    (324, "zksync", "0x7e645Ea4386deb2E9e510D805461aA12db83fb5E"),
    (8453, "base", "0x31801c3e09708549c1b2c9E1CFbF001399a1B9fa"),
    (31337, "anvil", "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
    (42161, "arbitrum", "0xA2b5aEDF7EEF6469AB9cBD99DE24a6881702Eb19"),
    (11155111, "sepolia", "0xa27c5C77DA713f410F9b15d4B0c52CAe597a973a"),
];

/// A deployment entry as it appears in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub chain_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub spender: String,
}

/// A resolved deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: String,
    pub spender: Address,
}

/// Static mapping from chain id to the deployed airdrop contract
#[derive(Debug, Clone, Default)]
pub struct NetworkTable {
    networks: BTreeMap<u64, Network>,
}

impl NetworkTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of known deployments
    pub fn builtin() -> Result<Self> {
        let mut table = Self::new();
        for (chain_id, name, spender) in BUILTIN_DEPLOYMENTS {
            table.insert(*chain_id, name, parse_address(spender)?);
        }
        Ok(table)
    }

    /// Known deployments, extended and overridden by configured entries
    pub fn with_overrides(entries: &[NetworkEntry]) -> Result<Self> {
        let mut table = Self::builtin()?;
        for entry in entries {
            let name = entry
                .name
                .clone()
                .or_else(|| table.networks.get(&entry.chain_id).map(|n| n.name.clone()))
                .unwrap_or_else(|| format!("chain-{}", entry.chain_id));
            table.insert(entry.chain_id, &name, parse_address(&entry.spender)?);
        }
        Ok(table)
    }

    pub fn insert(&mut self, chain_id: u64, name: &str, spender: Address) {
        self.networks.insert(
            chain_id,
            Network {
                chain_id,
                name: name.to_string(),
                spender,
            },
        );
    }

    /// Spender for the active chain; a missing entry is a configuration error
    pub fn spender_for(&self, chain_id: u64) -> Result<Address> {
        self.networks
            .get(&chain_id)
            .map(|network| network.spender)
            .ok_or(AirdropError::UnsupportedNetwork(chain_id))
    }

    pub fn get(&self, chain_id: u64) -> Option<&Network> {
        self.networks.get(&chain_id)
    }

    /// All entries ordered by chain id
    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }
}

fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| AirdropError::Configuration(format!("Invalid spender address '{}': {}", value, e)))
}
