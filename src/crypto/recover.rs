//! ECDSA public-key recovery.
//!
//! Recovery has no notion of validity: any well-formed `(r, s, bit)` yields
//! some public key. Callers must treat the resulting address as claimed and
//! anchor trust elsewhere (for example, a pre-registered address).

use secp256k1::ecdsa::RecoverableSignature;
use secp256k1::SECP256K1;

use super::hash::MessageHash;
use super::{PublicKey, RecoveryBit, Signature};
use crate::error::IdentityError;

/// Recovers the public key that produced `signature` over `message`.
pub fn recover_signature(
    message: &str,
    signature: &Signature,
    recovery_bit: RecoveryBit,
) -> Result<PublicKey, IdentityError> {
    if message.is_empty() {
        return Err(IdentityError::invalid_input("message is empty"));
    }

    let digest = MessageHash::of_message(message);
    let recoverable =
        RecoverableSignature::from_compact(signature.as_bytes(), recovery_bit.to_recovery_id()?)
            .map_err(|e| IdentityError::malformed(e.to_string()))?;

    let public_key = SECP256K1
        .recover_ecdsa(&digest.to_secp_message(), &recoverable)
        .map_err(|e| IdentityError::malformed(format!("recovery failed: {e}")))?;

    let public_key = PublicKey::from(public_key);
    tracing::debug!(?digest, %recovery_bit, address = %public_key.address(), "recovered public key");
    Ok(public_key)
}

/// Decodes `signature_hex` and recovers the signer's public key.
pub fn recover(
    message: &str,
    signature_hex: &str,
    recovery_bit: RecoveryBit,
) -> Result<PublicKey, IdentityError> {
    let signature = Signature::from_hex(signature_hex)?;
    recover_signature(message, &signature, recovery_bit)
}

/// Boundary form of [`recover`] for untyped input.
///
/// The recovery bit is validated first, so a missing or out-of-range bit is
/// reported before the signature is looked at.
pub fn recover_from_input(
    message: &str,
    signature_hex: &str,
    recovery_bit: Option<&str>,
) -> Result<PublicKey, IdentityError> {
    let recovery_bit = RecoveryBit::parse_optional(recovery_bit)?;
    recover(message, signature_hex, recovery_bit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign, Keypair};

    #[test]
    fn test_recover_round_trip() {
        let keypair = Keypair::generate();
        let (signature, bit) = sign(keypair.private_key(), "round trip").unwrap();

        let recovered = recover("round trip", &signature.to_hex(), bit).unwrap();
        assert_eq!(&recovered, keypair.public_key());
        assert_eq!(recovered.address(), *keypair.address());
    }

    #[test]
    fn test_wrong_bit_recovers_other_key() {
        let keypair = Keypair::generate();
        let (signature, bit) = sign(keypair.private_key(), "bits").unwrap();

        let right = recover_signature("bits", &signature, bit).unwrap();
        let wrong = recover_signature("bits", &signature, bit.flipped()).unwrap();
        assert_ne!(right, wrong);
        assert_ne!(right.address(), wrong.address());
    }

    #[test]
    fn test_different_message_recovers_other_key() {
        let keypair = Keypair::generate();
        let (signature, bit) = sign(keypair.private_key(), "exact text").unwrap();

        let recovered = recover_signature("exact text ", &signature, bit).unwrap();
        assert_ne!(&recovered, keypair.public_key());
    }

    #[test]
    fn test_boundary_errors() {
        let keypair = Keypair::generate();
        let (signature, _) = sign(keypair.private_key(), "msg").unwrap();
        let hex_sig = signature.to_hex();

        assert!(matches!(
            recover_from_input("msg", &hex_sig, None),
            Err(IdentityError::InvalidInput(_))
        ));
        assert!(matches!(
            recover_from_input("msg", &hex_sig, Some("2")),
            Err(IdentityError::InvalidInput(_))
        ));
        // The bit is checked before the signature.
        assert!(matches!(
            recover_from_input("msg", "not-hex", Some("")),
            Err(IdentityError::InvalidInput(_))
        ));
        assert!(matches!(
            recover_from_input("msg", "not-hex", Some("0")),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            recover_from_input("", &hex_sig, Some("0")),
            Err(IdentityError::InvalidInput(_))
        ));
        assert!(matches!(
            recover_from_input("msg", "", Some("0")),
            Err(IdentityError::InvalidInput(_))
        ));
    }
}
