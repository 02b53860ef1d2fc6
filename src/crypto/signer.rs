//! Recoverable ECDSA signing.

use secp256k1::SECP256K1;
use zeroize::Zeroizing;

use super::hash::MessageHash;
use super::{PrivateKey, RecoveryBit, Signature};
use crate::error::IdentityError;

/// Signs `message` with `private_key`.
///
/// The message is hashed with [`MessageHash::of_message`]. Nonces are
/// deterministic (RFC 6979), so the same key and message always produce the
/// same signature. `s` is low-S normalized.
pub fn sign(
    private_key: &PrivateKey,
    message: &str,
) -> Result<(Signature, RecoveryBit), IdentityError> {
    if message.is_empty() {
        return Err(IdentityError::invalid_input("message is empty"));
    }

    let digest = MessageHash::of_message(message);
    let mut secret_key = private_key.to_secret_key()?;
    let recoverable = SECP256K1.sign_ecdsa_recoverable(&digest.to_secp_message(), &secret_key);
    secret_key.non_secure_erase();

    let (recovery_id, compact) = recoverable.serialize_compact();
    let recovery_bit = RecoveryBit::from_recovery_id(recovery_id)?;
    let signature = Signature::from_compact(&compact)?;

    tracing::debug!(?digest, %recovery_bit, "signed message");
    Ok((signature, recovery_bit))
}

/// Parses a hex private key and signs `message` with it.
///
/// The decoded key lives only for the duration of this call.
pub fn sign_hex(
    private_key_hex: &str,
    message: &str,
) -> Result<(Signature, RecoveryBit), IdentityError> {
    let private_key_hex = Zeroizing::new(private_key_hex.trim().to_owned());
    let private_key = PrivateKey::from_hex(&private_key_hex)?;
    sign(&private_key, message)
}
