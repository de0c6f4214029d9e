//! # CLI Interface
//!
//! Defines the command-line argument structure for `vela` using `clap`
//! derive. Subcommands: `keygen`, `balance`, `derive`, `transfer`, `status`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VELA ledger command-line client.
///
/// Composes, signs, and submits units to a VELA node over JSON-RPC, and
/// reconciles submissions whose fate the network left unclear.
#[derive(Parser, Debug)]
#[command(
    name = "vela",
    about = "VELA ledger command-line client",
    version,
    propagate_version = true
)]
pub struct VelaCli {
    /// JSON-RPC endpoint of the node to talk to.
    #[arg(
        long,
        short = 'u',
        env = "VELA_RPC_URL",
        default_value = vela_client::config::DEFAULT_RPC_URL,
        global = true
    )]
    pub url: String,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "VELA_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `vela` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a funding keypair file and print its address.
    Keygen(KeygenArgs),
    /// Query the balance of an address.
    Balance(BalanceArgs),
    /// Derive a program-controlled address from seeds.
    Derive(DeriveArgs),
    /// Transfer native units from the funding keypair to a recipient.
    Transfer(TransferArgs),
    /// Look up the fate of a previously submitted unit by identifier.
    Status(StatusArgs),
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Where to write the keypair file.
    #[arg(long, short = 'o', env = "VELA_KEYPAIR", default_value = "~/.vela/id.json")]
    pub out: PathBuf,

    /// Overwrite an existing file instead of refusing.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `balance` subcommand.
#[derive(Parser, Debug)]
pub struct BalanceArgs {
    /// The address to query (base58).
    pub address: String,
}

/// Arguments for the `derive` subcommand.
#[derive(Parser, Debug)]
pub struct DeriveArgs {
    /// Owning program address (base58).
    pub program: String,

    /// Seeds, hashed in the order given (UTF-8 bytes).
    #[arg(required = true)]
    pub seeds: Vec<String>,

    /// Save the derived address in the local cache under this name.
    #[arg(long)]
    pub save_as: Option<String>,

    /// Path of the local address cache.
    #[arg(long, env = "VELA_CACHE", default_value = "~/.vela/addresses")]
    pub cache: PathBuf,
}

/// Arguments for the `transfer` subcommand.
#[derive(Parser, Debug)]
pub struct TransferArgs {
    /// Recipient address (base58).
    pub to: String,

    /// Amount in base units.
    pub amount: u64,

    /// Path of the funding keypair file.
    #[arg(long, short = 'k', env = "VELA_KEYPAIR", default_value = "~/.vela/id.json")]
    pub keypair: PathBuf,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// The unit identifier to look up (base58).
    pub identifier: String,
}
