//! Keccak-256 hashing and the message encoding shared by signing and recovery.

use std::fmt;

use tiny_keccak::{Hasher, Keccak};

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Computes the Keccak-256 digest of `bytes`.
#[inline]
pub fn keccak256(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Keccak::v256();
    hasher.update(bytes);

    let mut digest = [0u8; DIGEST_LEN];
    hasher.finalize(&mut digest);
    digest
}

/// Digest of a message, as signed and as recovered against.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHash([u8; DIGEST_LEN]);

impl MessageHash {
    /// Hashes the UTF-8 bytes of `message` exactly as given.
    ///
    /// No trimming or normalization happens here: `"abc"` and `"abc\n"` are
    /// different messages and recover different keys. Both the signer and the
    /// recoverer go through this function.
    pub fn of_message(message: &str) -> Self {
        Self(keccak256(message.as_bytes()))
    }

    /// Returns the digest bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub(crate) fn to_secp_message(self) -> secp256k1::Message {
        secp256k1::Message::from_digest(self.0)
    }
}

impl fmt::Debug for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageHash({})", hex::encode(self.0))
    }
}
