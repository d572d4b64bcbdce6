//! Single-key account implementation.

use crate::account::Account;
use crate::crypto::{
    AnyPrivateKey, AnyPublicKey, AuthenticationKey, CryptoMaterial, Ed25519PrivateKey, PublicKey,
    Scheme, Secp256k1PrivateKey,
};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// An account whose key is wrapped in [`AnyPublicKey`].
///
/// Its address is derived under the single-key scheme, so an Ed25519 key
/// held here lives at a different address than the same key in an
/// [`Ed25519Account`](crate::account::Ed25519Account).
#[derive(Clone)]
pub struct SingleKeyAccount {
    private_key: AnyPrivateKey,
    public_key: AnyPublicKey,
    address: AccountAddress,
}

impl SingleKeyAccount {
    /// Creates an account from a private key of either scheme.
    pub fn from_private_key(private_key: impl Into<AnyPrivateKey>) -> Self {
        let private_key = private_key.into();
        let public_key = private_key.public_key();
        let address = public_key.to_address();
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Generates a new random Ed25519 single-key account.
    pub fn generate_ed25519() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate())
    }

    /// Generates a new random Secp256k1 single-key account.
    pub fn generate_secp256k1() -> Self {
        Self::from_private_key(Secp256k1PrivateKey::generate())
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }
}

impl Account for SingleKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_bytes()
    }

    fn scheme(&self) -> Scheme {
        Scheme::SingleKey
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::single_key(
            self.public_key.clone(),
            self.private_key.sign(message),
        ))
    }
}

impl fmt::Debug for SingleKeyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleKeyAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Ed25519Account;

    #[test]
    fn test_secp256k1_sign() {
        let account = SingleKeyAccount::generate_secp256k1();
        let auth = account.sign(b"payload").unwrap();
        assert!(auth.verify(b"payload"));
        assert!(!auth.verify(b"other"));
        assert_eq!(auth.authentication_key(), Some(account.authentication_key()));
    }

    #[test]
    fn test_ed25519_single_key_address_differs() {
        let key = Ed25519PrivateKey::generate();
        let legacy = Ed25519Account::from_private_key(key.clone());
        let single = SingleKeyAccount::from_private_key(key);
        assert_ne!(legacy.address(), single.address());
        assert!(matches!(
            single.sign(b"m").unwrap(),
            AccountAuthenticator::SingleKey { .. }
        ));
    }
}
