//! Cryptographic operations for secp256k1 identities.
//!
//! This module provides:
//! - Keccak-256 hashing of messages and public keys
//! - Secure random key generation using secp256k1
//! - Recoverable ECDSA signing and public-key recovery
//! - Address derivation

mod address;
pub mod hash;
mod keypair;
mod recover;
mod signature;
mod signer;

pub use address::{Address, ADDRESS_LEN};
pub use hash::{keccak256, MessageHash};
pub use keypair::{is_valid_scalar, Keypair, PrivateKey, PublicKey};
pub use recover::{recover, recover_from_input, recover_signature};
pub use signature::{RecoveryBit, Signature};
pub use signer::{sign, sign_hex};
