//! Error types for the airdrop client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AirdropError>;

/// Notice shown when no airdrop contract is known for the active network
pub const UNSUPPORTED_NETWORK_NOTICE: &str = "No address found. Please use a supported network.";

/// Notice shown for every other failed submission
pub const TRANSACTION_FAILED_NOTICE: &str = "Transaction failed. Please try again.";

/// Main error type for the library
#[derive(Debug, Error)]
pub enum AirdropError {
    /// No airdrop contract is known for the chain id
    #[error("No airdrop contract configured for chain id {0}")]
    UnsupportedNetwork(u64),

    /// Bad RPC URL, bad key, bad config file or network table entry
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Form input that cannot be turned into a transaction intent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Contract read failed
    #[error("Contract read error: {0}")]
    Read(String),

    /// Transaction could not be broadcast, or was rejected
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Waiting for a receipt failed, timed out, or the transaction reverted
    #[error("Receipt error: {0}")]
    Receipt(String),

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// ABI loading error
    #[error("ABI load error: {0}")]
    AbiLoad(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Local key/value store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// A submission is already in flight
    #[error("A submission is already in progress")]
    Busy,
}

impl AirdropError {
    /// Whether the error stems from configuration rather than the chain
    pub fn is_configuration(&self) -> bool {
        matches!(self, AirdropError::Configuration(_) | AirdropError::UnsupportedNetwork(_))
    }

    /// The single user-visible notice for a failed submission.
    ///
    /// Chain failures map to one generic message; details go to the log.
    pub fn notice(&self) -> &'static str {
        match self {
            AirdropError::UnsupportedNetwork(_) => UNSUPPORTED_NETWORK_NOTICE,
            AirdropError::Busy => "A submission is already in progress.",
            _ => TRANSACTION_FAILED_NOTICE,
        }
    }
}
