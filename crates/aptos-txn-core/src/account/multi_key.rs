//! Multi-key account implementation.

use crate::account::Account;
use crate::crypto::{
    AnyPrivateKey, AnyPublicKey, AuthenticationKey, CryptoMaterial, MultiKeyPublicKey,
    MultiKeySignature, PublicKey, Scheme,
};
use crate::error::{AptosError, AptosResult};
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// An M-of-N account whose keys may use different schemes.
///
/// Like [`MultiEd25519Account`](crate::account::MultiEd25519Account), it
/// can hold just a subset of the private keys.
#[derive(Clone)]
pub struct MultiKeyAccount {
    private_keys: Vec<(u8, AnyPrivateKey)>,
    public_key: MultiKeyPublicKey,
    address: AccountAddress,
}

impl MultiKeyAccount {
    /// Creates an account that owns every private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set or threshold is invalid.
    pub fn new(private_keys: Vec<AnyPrivateKey>, signatures_required: u8) -> AptosResult<Self> {
        let public_keys = private_keys.iter().map(AnyPrivateKey::public_key).collect();
        let owned = private_keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| (index as u8, key))
            .collect();
        Self::from_keys(public_keys, owned, signatures_required)
    }

    /// Creates an account from the full public key set and the indexed
    /// private keys this party holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the multi-key is invalid, or a private key index
    /// is repeated, out of bounds or does not match its public key.
    pub fn from_keys(
        public_keys: Vec<AnyPublicKey>,
        mut private_keys: Vec<(u8, AnyPrivateKey)>,
        signatures_required: u8,
    ) -> AptosResult<Self> {
        let public_key = MultiKeyPublicKey::new(public_keys, signatures_required)?;

        private_keys.sort_by_key(|(index, _)| *index);
        if let Some(window) = private_keys.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(AptosError::InvalidPrivateKey(format!(
                "duplicate private key index {}",
                window[0].0
            )));
        }
        for (index, key) in &private_keys {
            match public_key.get(usize::from(*index)) {
                Some(expected) if key.public_key() == *expected => {}
                Some(_) => {
                    return Err(AptosError::InvalidPrivateKey(format!(
                        "private key at index {index} doesn't match public key"
                    )))
                }
                None => {
                    return Err(AptosError::InvalidPrivateKey(format!(
                        "private key index {index} out of bounds"
                    )))
                }
            }
        }

        let address = public_key.to_address();
        Ok(Self {
            private_keys,
            public_key,
            address,
        })
    }

    /// Returns the multi-key.
    pub fn public_key(&self) -> &MultiKeyPublicKey {
        &self.public_key
    }

    /// Returns the number of signatures required.
    pub fn signatures_required(&self) -> u8 {
        self.public_key.signatures_required()
    }

    /// Returns the indices of the private keys this account holds.
    pub fn owned_key_indices(&self) -> Vec<u8> {
        self.private_keys.iter().map(|(index, _)| *index).collect()
    }
}

impl Account for MultiKeyAccount {
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
        Scheme::MultiKey
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        let required = usize::from(self.signatures_required());
        if self.private_keys.len() < required {
            return Err(AptosError::InsufficientSignatures {
                required,
                provided: self.private_keys.len(),
            });
        }
        let signatures = self.private_keys[..required]
            .iter()
            .map(|(index, key)| (*index, key.sign(message)))
            .collect();
        Ok(AccountAuthenticator::multi_key(
            self.public_key.clone(),
            MultiKeySignature::new(signatures)?,
        ))
    }
}

impl fmt::Debug for MultiKeyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiKeyAccount")
            .field("address", &self.address)
            .field("signatures_required", &self.signatures_required())
            .field("owned_key_indices", &self.owned_key_indices())
            .finish_non_exhaustive()
    }
}
