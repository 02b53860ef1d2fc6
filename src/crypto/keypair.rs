//! secp256k1 keypair generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secp256k1::constants::{CURVE_ORDER, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use secp256k1::{SecretKey, SECP256K1};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::Address;
use crate::error::IdentityError;

/// A secp256k1 private key: a scalar in `[1, n-1]`.
///
/// Has no `Clone` and a redacted `Debug`. Bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; SECRET_KEY_SIZE]);

impl PrivateKey {
    /// Builds a private key from a 32-byte big-endian scalar.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; SECRET_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| IdentityError::invalid_input("private key must be 32 bytes"))?;
        if !is_valid_scalar(&bytes) {
            return Err(IdentityError::InvalidScalar);
        }
        Ok(Self(bytes))
    }

    /// Parses a 64-character hex private key (no `0x` prefix).
    pub fn from_hex(hex_str: &str) -> Result<Self, IdentityError> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str)
                .map_err(|_| IdentityError::invalid_input("private key is not valid hex"))?,
        );
        Self::from_slice(&bytes[..])
    }

    /// Returns the private key as lowercase hex. The string is wiped on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }

    /// Returns the scalar bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }

    pub(crate) fn to_secret_key(&self) -> Result<SecretKey, IdentityError> {
        SecretKey::from_slice(&self.0).map_err(|_| IdentityError::InvalidScalar)
    }

    /// Computes the matching public key by scalar multiplication of the base point.
    pub fn public_key(&self) -> Result<PublicKey, IdentityError> {
        let secret_key = self.to_secret_key()?;
        let public_key = secp256k1::PublicKey::from_secret_key(SECP256K1, &secret_key);
        Ok(PublicKey(public_key))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Returns true if `bytes` encodes a scalar in `[1, n-1]`.
pub fn is_valid_scalar(bytes: &[u8; SECRET_KEY_SIZE]) -> bool {
    // Big-endian byte arrays of equal length compare like the integers they encode.
    bytes.iter().any(|&b| b != 0) && bytes[..] < CURVE_ORDER[..]
}

/// A secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Parses a SEC1 public key, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityError> {
        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| IdentityError::invalid_input(format!("public key: {e}")))
    }

    /// Returns the 65-byte SEC1 uncompressed encoding (`04 || X || Y`).
    #[inline]
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        self.0.serialize_uncompressed()
    }

    /// Returns the uncompressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }

    /// Derives this key's address.
    #[inline]
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(inner: secp256k1::PublicKey) -> Self {
        Self(inner)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A private key with its public key and derived address.
#[derive(Debug)]
pub struct Keypair {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl Keypair {
    /// Generates a new random keypair from the operating system's CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a keypair from the given cryptographically secure RNG.
    ///
    /// Draws 32 bytes at a time; a draw that is zero or not below the curve
    /// order is discarded and redrawn.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut rejected = 0u32;
        loop {
            let mut candidate = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
            rng.fill_bytes(&mut candidate[..]);

            if let Ok(private_key) = PrivateKey::from_slice(&candidate[..]) {
                if let Ok(keypair) = Self::from_private_key(private_key) {
                    tracing::debug!(rejected, address = %keypair.address, "generated keypair");
                    return keypair;
                }
            }

            rejected += 1;
            tracing::trace!(rejected, "scalar out of range, resampling");
        }
    }

    /// Builds a keypair around an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Result<Self, IdentityError> {
        let public_key = private_key.public_key()?;
        let address = Address::from_public_key(&public_key);

        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    /// Builds a keypair from a 32-byte secret scalar.
    pub fn from_secret_key(secret_bytes: [u8; SECRET_KEY_SIZE]) -> Result<Self, IdentityError> {
        let secret_bytes = Zeroizing::new(secret_bytes);
        Self::from_private_key(PrivateKey::from_slice(&secret_bytes[..])?)
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns a reference to the derived address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}
