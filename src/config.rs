//! Command-line configuration.

use clap::{Args, Parser, Subcommand};

use crate::crypto::Address;
use crate::logging::LogFormat;
use crate::wallet::{InMemoryBalances, CHALLENGE_MESSAGE};

/// secp256k1 identity tool: generate keys, sign, and recover addresses
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log format: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a new private key, public key, and address
    Generate,
    /// Sign a message; the private key and message are read interactively
    Sign,
    /// Recover the address behind a signature and look up its balance
    Recover(RecoverArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RecoverArgs {
    /// Signature as hex (compact r||s, or DER)
    #[arg(short, long)]
    pub signature: String,

    /// Recovery bit (0 or 1)
    #[arg(short = 'b', long)]
    pub recovery_bit: Option<String>,

    /// Signed message
    #[arg(short, long, default_value = CHALLENGE_MESSAGE)]
    pub message: String,

    /// Known balance, as <address>=<amount> (repeatable)
    #[arg(long = "balance", value_name = "ADDRESS=AMOUNT")]
    pub balances: Vec<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::InvalidLogLevel);
        }
        if let Command::Recover(args) = &self.command {
            args.balance_table()?;
        }
        Ok(())
    }
}

impl RecoverArgs {
    /// Builds the balance table from the `--balance` entries.
    pub fn balance_table(&self) -> Result<InMemoryBalances, ConfigError> {
        self.balances
            .iter()
            .map(|entry| parse_balance_entry(entry))
            .collect()
    }
}

fn parse_balance_entry(entry: &str) -> Result<(Address, u64), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBalanceEntry {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let (address, amount) = entry
        .split_once('=')
        .ok_or_else(|| invalid("expected <address>=<amount>"))?;
    let address: Address = address
        .parse()
        .map_err(|_| invalid("address must be 40 hex characters"))?;
    let amount: u64 = amount
        .parse()
        .map_err(|_| invalid("amount must be a non-negative integer"))?;
    Ok((address, amount))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid balance entry {entry:?}: {reason}")]
    InvalidBalanceEntry { entry: String, reason: String },

    #[error("Log level cannot be empty")]
    InvalidLogLevel,
}
