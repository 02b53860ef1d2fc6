//! Address derivation and representation.

use std::fmt;
use std::str::FromStr;

use super::hash::{keccak256, DIGEST_LEN};
use super::PublicKey;
use crate::error::IdentityError;

/// Address length in bytes. Every derivation path truncates to this length.
pub const ADDRESS_LEN: usize = 20;

/// An address: the low-order 20 bytes of the Keccak-256 of a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Derives the address of a secp256k1 public key.
    ///
    /// Process:
    /// 1. Serialize the public key in uncompressed form (65 bytes)
    /// 2. Remove the first byte (0x04 prefix)
    /// 3. Hash the remaining 64 bytes with Keccak-256
    /// 4. Take the last 20 bytes of the hash
    ///
    /// Generation and recovery both call this; there is no other derivation.
    #[inline]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let public_key_bytes = public_key.to_uncompressed();
        let hash = keccak256(&public_key_bytes[1..]);

        let mut address_bytes = [0u8; ADDRESS_LEN];
        address_bytes.copy_from_slice(&hash[DIGEST_LEN - ADDRESS_LEN..]);

        Self(address_bytes)
    }

    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    /// Parses the canonical form: exactly 40 hex characters, no prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LEN * 2 {
            return Err(IdentityError::invalid_input(format!(
                "address must be {} hex characters, got {}",
                ADDRESS_LEN * 2,
                s.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| IdentityError::invalid_input(format!("address: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
