//! Single-key accounts backed by an Ed25519 secret.
//!
//! These sign with the legacy `Ed25519` authenticator, not `SingleKey`.

use crate::account::Account;
use crate::crypto::{
    AuthenticationKey, CryptoMaterial, Ed25519PrivateKey, Ed25519PublicKey, PublicKey, Scheme,
};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// Holds an Ed25519 key pair and the address it derives.
#[derive(Clone)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate())
    }

    /// Derives the public key and address from `private_key`.
    pub fn from_private_key(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let address = public_key.to_address();
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Like [`Ed25519Account::from_private_key`], from 32 bytes of hex.
    ///
    /// # Errors
    ///
    /// Fails on bad hex or a wrong length.
    pub fn from_private_key_hex(hex_str: &str) -> AptosResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_hex(hex_str)?))
    }

    #[allow(missing_docs)]
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// The secret, for handing to hex-boundary signing.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }
}

impl Account for Ed25519Account {
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
        Scheme::Ed25519
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::ed25519(
            self.public_key,
            self.private_key.sign(message),
        ))
    }
}

impl fmt::Debug for Ed25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
