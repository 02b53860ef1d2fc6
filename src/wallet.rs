//! Signature → address → balance pipeline.
//!
//! Given the challenge message, a signature, and a recovery bit, the pipeline
//! recovers the claimed address and asks a [`BalanceSource`] for its balance.
//! Any failure yields the empty view; a previous result is never carried over.

use std::collections::HashMap;

use thiserror::Error;

use crate::crypto::{recover_from_input, Address};
use crate::error::IdentityError;

/// The fixed, publicly known message identities sign to prove ownership.
pub const CHALLENGE_MESSAGE: &str = "cryptography is the real truth";

/// Failure reported by a balance source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("balance lookup unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// Looks up the balance held by an address.
///
/// Stands in for the external `GET /balance/{address}` service. Addresses the
/// source has never seen have balance `0`.
pub trait BalanceSource {
    fn balance_of(&self, address: &Address) -> Result<u64, BalanceError>;
}

/// Balance table held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBalances {
    balances: HashMap<Address, u64>,
}

impl InMemoryBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance of `address`, returning the previous one.
    pub fn insert(&mut self, address: Address, balance: u64) -> Option<u64> {
        self.balances.insert(address, balance)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl FromIterator<(Address, u64)> for InMemoryBalances {
    fn from_iter<I: IntoIterator<Item = (Address, u64)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

impl BalanceSource for InMemoryBalances {
    fn balance_of(&self, address: &Address) -> Result<u64, BalanceError> {
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }
}

/// Result of one resolution: the claimed address and its balance.
///
/// `Default` is the unresolved state: no address, zero balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityView {
    pub address: Option<Address>,
    pub balance: u64,
}

impl IdentityView {
    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }

    /// Address in canonical hex, or the empty string when unresolved.
    pub fn address_hex(&self) -> String {
        self.address.map(|a| a.to_hex()).unwrap_or_default()
    }
}

/// Recovers the address behind a signature and looks up its balance.
pub fn try_resolve_identity<B: BalanceSource + ?Sized>(
    message: &str,
    signature_hex: &str,
    recovery_bit: Option<&str>,
    balances: &B,
) -> Result<IdentityView, WalletError> {
    let public_key = recover_from_input(message, signature_hex, recovery_bit)?;
    let address = public_key.address();
    let balance = balances.balance_of(&address)?;

    Ok(IdentityView {
        address: Some(address),
        balance,
    })
}

/// Like [`try_resolve_identity`], but any failure becomes the empty view.
pub fn resolve_identity<B: BalanceSource + ?Sized>(
    message: &str,
    signature_hex: &str,
    recovery_bit: Option<&str>,
    balances: &B,
) -> IdentityView {
    match try_resolve_identity(message, signature_hex, recovery_bit, balances) {
        Ok(view) => view,
        Err(e) => {
            tracing::warn!(error = %e, "identity unresolved");
            IdentityView::default()
        }
    }
}

/// Holds the most recent resolution against the challenge message.
#[derive(Debug)]
pub struct Wallet<B> {
    balances: B,
    current: IdentityView,
}

impl<B: BalanceSource> Wallet<B> {
    pub fn new(balances: B) -> Self {
        Self {
            balances,
            current: IdentityView::default(),
        }
    }

    /// Resolves a signature over [`CHALLENGE_MESSAGE`] and replaces the
    /// current view with the outcome, including on failure.
    pub fn find_address(
        &mut self,
        signature_hex: &str,
        recovery_bit: Option<&str>,
    ) -> Result<IdentityView, WalletError> {
        let outcome = try_resolve_identity(
            CHALLENGE_MESSAGE,
            signature_hex,
            recovery_bit,
            &self.balances,
        );
        self.current = match &outcome {
            Ok(view) => *view,
            Err(e) => {
                tracing::warn!(error = %e, "identity unresolved, clearing view");
                IdentityView::default()
            }
        };
        outcome
    }

    /// Returns the latest view.
    pub fn current(&self) -> &IdentityView {
        &self.current
    }

    pub fn balances(&self) -> &B {
        &self.balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign, Keypair};

    struct FailingBalances;

    impl BalanceSource for FailingBalances {
        fn balance_of(&self, _address: &Address) -> Result<u64, BalanceError> {
            Err(BalanceError::Unavailable("connection refused".into()))
        }
    }

    fn signed_challenge() -> (Keypair, String, String) {
        let keypair = Keypair::generate();
        let (signature, bit) = sign(keypair.private_key(), CHALLENGE_MESSAGE).unwrap();
        (keypair, signature.to_hex(), bit.to_string())
    }

    #[test]
    fn test_resolve_known_address() {
        let (keypair, signature, bit) = signed_challenge();
        let balances: InMemoryBalances = [(*keypair.address(), 75)].into_iter().collect();

        let view = resolve_identity(CHALLENGE_MESSAGE, &signature, Some(&bit), &balances);
        assert_eq!(view.address, Some(*keypair.address()));
        assert_eq!(view.balance, 75);
        assert_eq!(view.address_hex(), keypair.address().to_hex());
    }

    #[test]
    fn test_unknown_address_has_zero_balance() {
        let (keypair, signature, bit) = signed_challenge();
        let view = resolve_identity(
            CHALLENGE_MESSAGE,
            &signature,
            Some(&bit),
            &InMemoryBalances::new(),
        );
        assert_eq!(view.address, Some(*keypair.address()));
        assert_eq!(view.balance, 0);
    }

    #[test]
    fn test_failures_reset_view() {
        let (_, signature, bit) = signed_challenge();
        let balances = InMemoryBalances::new();

        let malformed = resolve_identity(CHALLENGE_MESSAGE, "not-hex", Some("0"), &balances);
        assert_eq!(malformed, IdentityView::default());
        assert_eq!(malformed.address_hex(), "");

        let lookup_down =
            resolve_identity(CHALLENGE_MESSAGE, &signature, Some(&bit), &FailingBalances);
        assert!(!lookup_down.is_resolved());
        assert_eq!(lookup_down.balance, 0);
    }

    #[test]
    fn test_wallet_clears_stale_view() {
        let (keypair, signature, bit) = signed_challenge();
        let balances: InMemoryBalances = [(*keypair.address(), 10)].into_iter().collect();
        let mut wallet = Wallet::new(balances);

        wallet.find_address(&signature, Some(&bit)).unwrap();
        assert_eq!(wallet.current().address, Some(*keypair.address()));
        assert_eq!(wallet.current().balance, 10);

        let err = wallet.find_address("not-hex", Some("0")).unwrap_err();
        assert!(matches!(
            err,
            WalletError::Identity(IdentityError::MalformedSignature(_))
        ));
        assert_eq!(wallet.current(), &IdentityView::default());

        let err = wallet.find_address(&signature, None).unwrap_err();
        assert!(matches!(
            err,
            WalletError::Identity(IdentityError::InvalidInput(_))
        ));
        assert!(!wallet.current().is_resolved());
    }
}
