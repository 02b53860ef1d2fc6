//! # sigwallet
//!
//! secp256k1 identities whose address can be recovered from a signature.
//!
//! A private key yields a public key and a 20-byte address. A signature over a
//! known message plus a recovery bit lets anyone recompute the signer's public
//! key and address without the signer sending either.
//!
//! ## Architecture
//!
//! - `crypto`: Hashing, key generation, signing, recovery, and address derivation
//! - `wallet`: Signature → address → balance pipeline
//! - `config`: Command-line configuration
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types

pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod wallet;

pub use config::Config;
pub use crypto::{
    recover, recover_from_input, sign, sign_hex, Address, Keypair, PrivateKey, PublicKey,
    RecoveryBit, Signature,
};
pub use error::IdentityError;
pub use logging::{init_logging, LogFormat};
pub use wallet::{
    resolve_identity, BalanceSource, IdentityView, InMemoryBalances, Wallet, CHALLENGE_MESSAGE,
};
