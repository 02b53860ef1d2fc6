//! secp256k1 identity CLI
//!
//! Usage:
//!   sigwallet generate                        # New private key, public key, address
//!   sigwallet sign                            # Prompts for private key and message
//!   sigwallet recover -s <sig> -b 0           # Address behind a challenge signature
//!   sigwallet recover -s <sig> -b 1 --balance <address>=100

use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use zeroize::Zeroizing;

use sigwallet::config::{Command, ConfigError, RecoverArgs};
use sigwallet::wallet::{try_resolve_identity, WalletError};
use sigwallet::{init_logging, sign_hex, Config, IdentityError, Keypair};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    init_logging(&config.log_level, config.log_format);

    let result = match &config.command {
        Command::Generate => run_generate(),
        Command::Sign => run_sign(),
        Command::Recover(args) => run_recover(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_generate() -> Result<(), CliError> {
    let keypair = Keypair::generate();

    println!("Private Key: {}", keypair.private_key().to_hex().as_str());
    println!("Public Key: {}", keypair.public_key());
    println!("Address: {}", keypair.address());
    Ok(())
}

fn run_sign() -> Result<(), CliError> {
    let private_key = Zeroizing::new(rpassword::prompt_password("Enter your private key: ")?);
    let message = prompt_line("Enter your message: ")?;

    let signed = sign_hex(&private_key, &message);
    drop(private_key);
    let (signature, recovery_bit) = signed?;

    println!("\nSignature: {}", signature);
    println!("Recovery Bit: {}", recovery_bit);
    Ok(())
}

fn run_recover(args: &RecoverArgs) -> Result<(), CliError> {
    let balances = args.balance_table()?;

    match try_resolve_identity(
        &args.message,
        &args.signature,
        args.recovery_bit.as_deref(),
        &balances,
    ) {
        Ok(view) => {
            println!("Address: {}", view.address_hex());
            println!("Balance: {}", view.balance);
            Ok(())
        }
        Err(e) => {
            println!("Address: ");
            println!("Balance: 0");
            Err(e.into())
        }
    }
}

/// Reads one line from stdin, dropping only the line terminator.
fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}
