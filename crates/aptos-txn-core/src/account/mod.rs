//! Transaction signers.
//!
//! An [`Account`] turns a signing message into the [`AccountAuthenticator`]
//! that proves its approval. Each implementation picks the authenticator
//! variant that matches its key type.
//!
//! # Account Types
//!
//! - [`Ed25519Account`] - Single-key Ed25519 account (most common)
//! - [`SingleKeyAccount`] - Ed25519 or Secp256k1 key under the single-key scheme
//! - [`MultiEd25519Account`] - M-of-N multi-signature Ed25519 account
//! - [`MultiKeyAccount`] - M-of-N account mixing key schemes
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::account::{Account, Ed25519Account};
//!
//! let account = Ed25519Account::generate();
//! let authenticator = account.sign(b"message").unwrap();
//! assert!(authenticator.verify(b"message"));
//! ```

mod ed25519;
mod multi_ed25519;
mod multi_key;
mod single_key;

pub use ed25519::Ed25519Account;
pub use multi_ed25519::MultiEd25519Account;
pub use multi_key::MultiKeyAccount;
pub use single_key::SingleKeyAccount;

use crate::crypto::{AnyPrivateKey, AuthenticationKey, Scheme};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// Trait for account types that can sign transactions.
pub trait Account: Send + Sync + fmt::Debug {
    /// Returns the account address.
    fn address(&self) -> AccountAddress;

    /// Returns the authentication key.
    fn authentication_key(&self) -> AuthenticationKey;

    /// Returns the public key bytes.
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Returns the authentication key scheme for this account type.
    fn scheme(&self) -> Scheme;

    /// Signs a message and wraps the result in an authenticator.
    ///
    /// # Errors
    ///
    /// Multi-signature accounts return an error when they hold fewer keys
    /// than their threshold.
    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator>;
}

/// Builds an account from a private key string.
///
/// Ed25519 keys (bare hex or `ed25519-priv-` prefixed) give an
/// [`Ed25519Account`]; Secp256k1 keys give a [`SingleKeyAccount`].
///
/// # Errors
///
/// Returns an error if the key string cannot be parsed.
pub fn account_from_private_key(private_key: &str) -> AptosResult<Box<dyn Account>> {
    Ok(match AnyPrivateKey::from_aip80(private_key)? {
        AnyPrivateKey::Ed25519(key) => Box::new(Ed25519Account::from_private_key(key)),
        key @ AnyPrivateKey::Secp256k1(_) => Box::new(SingleKeyAccount::from_private_key(key)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};

    #[test]
    fn test_account_from_private_key() {
        let ed = Ed25519PrivateKey::generate();
        let account = account_from_private_key(&ed.to_hex()).unwrap();
        assert_eq!(account.scheme(), Scheme::Ed25519);
        assert_eq!(account.address(), ed.public_key().to_address());

        let secp = Secp256k1PrivateKey::generate();
        let aip80 = AnyPrivateKey::from(secp).to_aip80();
        let account = account_from_private_key(&aip80).unwrap();
        assert_eq!(account.scheme(), Scheme::SingleKey);
        assert!(matches!(
            account.sign(b"msg").unwrap(),
            AccountAuthenticator::SingleKey { .. }
        ));

        assert!(account_from_private_key("p256-priv-0x01").is_err());
    }

    #[test]
    fn test_address_is_authentication_key() {
        let accounts: Vec<Box<dyn Account>> = vec![
            Box::new(Ed25519Account::generate()),
            Box::new(SingleKeyAccount::generate_secp256k1()),
        ];
        for account in accounts {
            assert_eq!(
                account.address(),
                account.authentication_key().account_address()
            );
        }
    }
}
