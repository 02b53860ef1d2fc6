//! Signature `(r, s)` and recovery bit types.

use std::fmt;
use std::str::FromStr;

use secp256k1::constants::{COMPACT_SIGNATURE_SIZE, CURVE_ORDER};
use secp256k1::ecdsa::RecoveryId;

use crate::error::IdentityError;

const SCALAR_LEN: usize = COMPACT_SIGNATURE_SIZE / 2;

/// An ECDSA signature in compact `r || s` form (64 bytes, big-endian scalars).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; COMPACT_SIGNATURE_SIZE]);

impl Signature {
    /// Builds a signature from compact bytes, rejecting `r` or `s` that are
    /// zero or not below the curve order.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; COMPACT_SIGNATURE_SIZE] = bytes.try_into().map_err(|_| {
            IdentityError::malformed(format!(
                "expected {} bytes, got {}",
                COMPACT_SIGNATURE_SIZE,
                bytes.len()
            ))
        })?;

        let (r, s) = bytes.split_at(SCALAR_LEN);
        check_scalar("r", r)?;
        check_scalar("s", s)?;

        Ok(Self(bytes))
    }

    /// Decodes a hex signature.
    ///
    /// 128 hex characters are read as compact `r || s`. Anything else is tried
    /// as DER, which is how signatures are often exported by other tools.
    pub fn from_hex(hex_str: &str) -> Result<Self, IdentityError> {
        if hex_str.is_empty() {
            return Err(IdentityError::invalid_input("signature is empty"));
        }

        let bytes =
            hex::decode(hex_str).map_err(|e| IdentityError::malformed(format!("hex: {e}")))?;
        if bytes.len() == COMPACT_SIGNATURE_SIZE {
            return Self::from_compact(&bytes);
        }

        let der = secp256k1::ecdsa::Signature::from_der(&bytes).map_err(|_| {
            IdentityError::malformed(format!(
                "{} bytes is neither a compact nor a DER signature",
                bytes.len()
            ))
        })?;
        Self::from_compact(&der.serialize_compact())
    }

    /// Returns the `r` scalar.
    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_LEN]
    }

    /// Returns the `s` scalar.
    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_LEN..]
    }

    /// Returns the compact encoding.
    pub const fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_SIZE] {
        &self.0
    }

    /// Returns the compact encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn check_scalar(name: &str, scalar: &[u8]) -> Result<(), IdentityError> {
    if scalar.iter().all(|&b| b == 0) {
        return Err(IdentityError::malformed(format!("{name} is zero")));
    }
    if scalar >= &CURVE_ORDER[..] {
        return Err(IdentityError::malformed(format!(
            "{name} is not below the curve order"
        )));
    }
    Ok(())
}

impl FromStr for Signature {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Selects which of the two candidate public keys a signature recovers to.
///
/// Only `0` and `1` are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryBit {
    Zero,
    One,
}

impl RecoveryBit {
    /// Returns the bit as an integer.
    pub const fn as_u8(self) -> u8 {
        match self {
            RecoveryBit::Zero => 0,
            RecoveryBit::One => 1,
        }
    }

    /// Returns the other bit.
    pub const fn flipped(self) -> Self {
        match self {
            RecoveryBit::Zero => RecoveryBit::One,
            RecoveryBit::One => RecoveryBit::Zero,
        }
    }

    /// Validates an optional textual bit at an input boundary.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, IdentityError> {
        match value {
            Some(s) => s.parse(),
            None => Err(IdentityError::invalid_input("recovery bit is missing")),
        }
    }

    pub(crate) fn to_recovery_id(self) -> Result<RecoveryId, IdentityError> {
        RecoveryId::from_i32(i32::from(self.as_u8()))
            .map_err(|e| IdentityError::invalid_input(format!("recovery bit: {e}")))
    }

    pub(crate) fn from_recovery_id(id: RecoveryId) -> Result<Self, IdentityError> {
        match id.to_i32() {
            0 => Ok(RecoveryBit::Zero),
            1 => Ok(RecoveryBit::One),
            other => Err(IdentityError::invalid_input(format!(
                "recovery id {other} is outside 0..=1"
            ))),
        }
    }
}

impl TryFrom<u8> for RecoveryBit {
    type Error = IdentityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecoveryBit::Zero),
            1 => Ok(RecoveryBit::One),
            other => Err(IdentityError::invalid_input(format!(
                "recovery bit must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl FromStr for RecoveryBit {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(RecoveryBit::Zero),
            "1" => Ok(RecoveryBit::One),
            "" => Err(IdentityError::invalid_input("recovery bit is empty")),
            other => Err(IdentityError::invalid_input(format!(
                "recovery bit must be 0 or 1, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for RecoveryBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_minus(k: u8) -> [u8; 32] {
        let mut bytes = CURVE_ORDER;
        bytes[31] -= k;
        bytes
    }

    fn compact(r: [u8; 32], s: [u8; 32]) -> Vec<u8> {
        [r, s].concat()
    }

    fn one() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        bytes
    }

    #[test]
    fn test_compact_bounds() {
        assert!(Signature::from_compact(&compact(one(), order_minus(1))).is_ok());
        assert!(matches!(
            Signature::from_compact(&compact([0u8; 32], one())),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature::from_compact(&compact(one(), [0u8; 32])),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature::from_compact(&compact(CURVE_ORDER, one())),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature::from_compact(&compact(one(), [0xff; 32])),
            Err(IdentityError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_hex_decoding_errors() {
        assert!(matches!(
            Signature::from_hex("not-hex"),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature::from_hex("abcd"),
            Err(IdentityError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature::from_hex(""),
            Err(IdentityError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_der_is_accepted() {
        let compact_bytes = compact(one(), one());
        let der = secp256k1::ecdsa::Signature::from_compact(&compact_bytes)
            .unwrap()
            .serialize_der();

        let sig = Signature::from_hex(&hex::encode(&der[..])).unwrap();
        assert_eq!(sig.as_bytes()[..], compact_bytes[..]);
        assert_eq!(sig.r(), &one()[..]);
        assert_eq!(sig.s(), &one()[..]);
    }

    #[test]
    fn test_recovery_bit_boundary() {
        assert_eq!("0".parse::<RecoveryBit>().unwrap(), RecoveryBit::Zero);
        assert_eq!("1".parse::<RecoveryBit>().unwrap(), RecoveryBit::One);
        for bad in ["", "2", "-1", " 1", "01", "true"] {
            assert!(matches!(
                bad.parse::<RecoveryBit>(),
                Err(IdentityError::InvalidInput(_))
            ));
        }
        assert!(RecoveryBit::try_from(2u8).is_err());
        assert!(RecoveryBit::try_from(3u8).is_err());
        assert!(matches!(
            RecoveryBit::parse_optional(None),
            Err(IdentityError::InvalidInput(_))
        ));
        assert_eq!(RecoveryBit::One.flipped(), RecoveryBit::Zero);
        assert_eq!(RecoveryBit::One.to_string(), "1");
    }
}
