//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erc20-airdrop")]
#[command(about = "Send an ERC-20 token to many recipients in one transaction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "AIRDROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// RPC endpoint URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key for signing transactions
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// File holding the saved form fields
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the total of an amount list (defaults to the saved amounts)
    Total {
        /// Comma or newline separated amounts
        #[arg(long, conflicts_with = "amounts_file")]
        amounts: Option<String>,

        /// Read amounts from a file
        #[arg(long)]
        amounts_file: Option<PathBuf>,
    },

    /// Update the saved form fields
    Set(FieldArgs),

    /// Show the saved form with the token's symbol, balance and amount needed
    Show,

    /// Forget every saved field
    Clear,

    /// List known airdrop contract deployments
    Networks,

    /// Read allowance and encode the airdrop without sending anything
    Plan(FieldArgs),

    /// Approve if needed, then send the airdrop
    Send(FieldArgs),
}

/// Form fields; anything given here is saved before the command runs
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Token contract address
    #[arg(short, long)]
    pub token: Option<String>,

    /// Comma or newline separated recipient addresses
    #[arg(long, conflicts_with = "recipients_file")]
    pub recipients: Option<String>,

    /// Read recipients from a file
    #[arg(long)]
    pub recipients_file: Option<PathBuf>,

    /// Comma or newline separated amounts, in whole tokens
    #[arg(long, conflicts_with = "amounts_file")]
    pub amounts: Option<String>,

    /// Read amounts from a file
    #[arg(long)]
    pub amounts_file: Option<PathBuf>,
}
