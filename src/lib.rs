//! ERC-20 Batch Airdrop Client
//!
//! Sends an ERC-20 token to many recipients in one transaction through a
//! pre-deployed airdrop contract (`airdropERC20`), built on top of Alloy.
//!
//! # Features
//!
//! - Forgiving amount aggregation over comma/newline delimited lists
//! - Exact fixed-point conversion into the token's smallest unit
//! - Approve-then-airdrop sequencing with an explicit state machine
//! - Chain id to airdrop contract resolution that fails closed
//! - Persisted form fields through a pluggable key/value store
//!
//! # Example
//!
//! ```rust,no_run
//! use erc20_airdrop::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(ChainClient::new(
//!         ProviderConfig {
//!             rpc_url: "http://localhost:8545".to_string(),
//!             receipt_timeout_seconds: 120,
//!             poll_interval_ms: 1000,
//!         },
//!         "0x...",
//!     )?);
//!
//!     let mut form = AirdropForm::restore(Arc::new(MemoryStore::new()));
//!     form.set_token_address("0x...");
//!     form.set_recipients("0x...,\n0x...");
//!     form.set_amounts("100, 250.5");
//!
//!     let ctx = SubmissionContext {
//!         chain_id: client.chain_id().await?,
//!         account: client.account(),
//!     };
//!
//!     let mut controller = AirdropController::with_client(
//!         client,
//!         NetworkTable::builtin()?,
//!         Abis::builtin()?,
//!         form,
//!     );
//!
//!     let outcome = controller.submit(&ctx).await?;
//!     println!("{}", outcome.notice());
//!
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod amounts;
pub mod chain;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod intent;
pub mod networks;
pub mod provider;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use abi::Abis;
pub use amounts::{calculate_total, format_units, parse_units, split_entries};
pub use chain::{ContractReader, ContractWriter, ReceiptWaiter, TxReceipt};
pub use controller::{
    AirdropController, AirdropPlan, SubmissionContext, SubmissionOutcome, SubmissionState,
};
pub use error::{AirdropError, Result};
pub use form::AirdropForm;
pub use intent::TransactionIntent;
pub use networks::{Network, NetworkEntry, NetworkTable};
pub use provider::{ChainClient, ProviderConfig};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use token::TokenInfo;

// Re-export Alloy types for convenience
pub use alloy_dyn_abi::DynSolValue;
pub use alloy_json_abi::JsonAbi;
pub use alloy_primitives::{Address, TxHash, U256};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::abi::Abis;
    pub use crate::amounts::calculate_total;
    pub use crate::chain::{ContractReader, ContractWriter, ReceiptWaiter, TxReceipt};
    pub use crate::controller::{AirdropController, SubmissionContext, SubmissionState};
    pub use crate::error::{AirdropError, Result};
    pub use crate::form::AirdropForm;
    pub use crate::intent::TransactionIntent;
    pub use crate::networks::NetworkTable;
    pub use crate::provider::{ChainClient, ProviderConfig};
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
    pub use alloy_dyn_abi::DynSolValue;
    pub use alloy_primitives::{Address, TxHash, U256};
}
