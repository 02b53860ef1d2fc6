//! Error taxonomy for signing and recovery.

use thiserror::Error;

/// Errors surfaced by the signer, the recoverer, and key parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Missing or out-of-range recovery bit, empty message or signature,
    /// undecodable key text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Signature that cannot be decoded into a usable `(r, s)` pair.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Private key outside `[1, n-1]`.
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,
}

impl IdentityError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSignature(msg.into())
    }
}
