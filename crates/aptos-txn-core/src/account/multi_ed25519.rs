//! Multi-Ed25519 account implementation.
//!
//! A [`MultiEd25519Account`] knows the full k-of-n public key but may hold
//! only some of the private keys. Each holder signs with its own subset and
//! the partial signatures can be combined with
//! [`MultiEd25519Account::aggregate_signatures`].

use crate::account::Account;
use crate::crypto::{
    AuthenticationKey, CryptoMaterial, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature,
    MultiEd25519PublicKey, MultiEd25519Signature, PublicKey, Scheme,
};
use crate::error::{AptosError, AptosResult};
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// An M-of-N Ed25519 account.
#[derive(Clone)]
pub struct MultiEd25519Account {
    private_keys: Vec<(u8, Ed25519PrivateKey)>,
    public_key: MultiEd25519PublicKey,
    address: AccountAddress,
}

impl MultiEd25519Account {
    /// Creates an account that owns every private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set or threshold is invalid.
    pub fn new(private_keys: Vec<Ed25519PrivateKey>, threshold: u8) -> AptosResult<Self> {
        let public_keys = private_keys.iter().map(Ed25519PrivateKey::public_key).collect();
        let owned = private_keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| (index as u8, key))
            .collect();
        Self::from_keys(public_keys, owned, threshold)
    }

    /// Creates an account from the full public key set and the subset of
    /// private keys this party holds, each tagged with its key index.
    ///
    /// ```rust
    /// use aptos_txn_core::account::{Account, MultiEd25519Account};
    /// use aptos_txn_core::crypto::Ed25519PrivateKey;
    ///
    /// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
    /// let public_keys = keys.iter().map(|k| k.public_key()).collect();
    /// // 2-of-3 where we own keys 0 and 2
    /// let account = MultiEd25519Account::from_keys(
    ///     public_keys,
    ///     vec![(0, keys[0].clone()), (2, keys[2].clone())],
    ///     2,
    /// )
    /// .unwrap();
    /// assert!(account.sign(b"msg").unwrap().verify(b"msg"));
    /// ```
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The multi-Ed25519 public key creation fails
    /// - A private key index is out of bounds or repeated
    /// - A private key doesn't match the public key at its index
    pub fn from_keys(
        public_keys: Vec<Ed25519PublicKey>,
        mut private_keys: Vec<(u8, Ed25519PrivateKey)>,
        threshold: u8,
    ) -> AptosResult<Self> {
        let public_key = MultiEd25519PublicKey::new(public_keys, threshold)?;

        private_keys.sort_by_key(|(index, _)| *index);
        for window in private_keys.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "duplicate private key index {}",
                    window[0].0
                )));
            }
        }
        for (index, key) in &private_keys {
            let expected = public_key
                .public_keys()
                .get(usize::from(*index))
                .ok_or_else(|| {
                    AptosError::InvalidPrivateKey(format!("private key index {index} out of bounds"))
                })?;
            if key.public_key() != *expected {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "private key at index {index} doesn't match public key"
                )));
            }
        }

        let address = public_key.to_address();
        Ok(Self {
            private_keys,
            public_key,
            address,
        })
    }

    /// Creates a view-only account that holds no private keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set or threshold is invalid.
    pub fn view_only(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> AptosResult<Self> {
        Self::from_keys(public_keys, vec![], threshold)
    }

    /// Returns the multi-key.
    pub fn public_key(&self) -> &MultiEd25519PublicKey {
        &self.public_key
    }

    /// Returns the number of signatures required.
    pub fn threshold(&self) -> u8 {
        self.public_key.threshold()
    }

    /// Returns the indices of the private keys this account holds.
    pub fn owned_key_indices(&self) -> Vec<u8> {
        self.private_keys.iter().map(|(index, _)| *index).collect()
    }

    /// Returns true if this account alone can meet the threshold.
    pub fn can_sign(&self) -> bool {
        self.private_keys.len() >= usize::from(self.threshold())
    }

    /// Signs with the owned keys, returning `(index, signature)` pairs.
    ///
    /// Unlike [`Account::sign`] this never checks the threshold, so it is
    /// the way to contribute a partial signature.
    pub fn sign_contributions(&self, message: &[u8]) -> Vec<(u8, Ed25519Signature)> {
        self.private_keys
            .iter()
            .map(|(index, key)| (*index, key.sign(message)))
            .collect()
    }

    /// Combines partial signatures into one multi-signature.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate or out-of-range indices.
    pub fn aggregate_signatures(
        signatures: Vec<(u8, Ed25519Signature)>,
    ) -> AptosResult<MultiEd25519Signature> {
        MultiEd25519Signature::new(signatures)
    }
}

impl Account for MultiEd25519Account {
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
        Scheme::MultiEd25519
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        let threshold = usize::from(self.threshold());
        if self.private_keys.len() < threshold {
            return Err(AptosError::InsufficientSignatures {
                required: threshold,
                provided: self.private_keys.len(),
            });
        }
        let signatures = self.private_keys[..threshold]
            .iter()
            .map(|(index, key)| (*index, key.sign(message)))
            .collect();
        Ok(AccountAuthenticator::multi_ed25519(
            self.public_key.clone(),
            MultiEd25519Signature::new(signatures)?,
        ))
    }
}

impl fmt::Debug for MultiEd25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiEd25519Account")
            .field("address", &self.address)
            .field(
                "keys",
                &format!(
                    "{}-of-{} (own {:?})",
                    self.threshold(),
                    self.public_key.public_keys().len(),
                    self.owned_key_indices()
                ),
            )
            .finish_non_exhaustive()
    }
}
