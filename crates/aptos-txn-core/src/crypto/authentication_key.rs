//! Authentication keys and the scheme identifiers they are derived with.

use crate::crypto::{decode_hex, sha3_256_of};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;

/// The byte appended to key material before hashing.
///
/// The first four identify account key schemes; the rest are only used to
/// derive object and resource account addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scheme {
    /// A single Ed25519 key.
    Ed25519 = 0,
    /// A legacy k-of-n Ed25519 key.
    MultiEd25519 = 1,
    /// A single key of any supported type.
    SingleKey = 2,
    /// A k-of-n key of mixed types.
    MultiKey = 3,
    /// An object derived from another object.
    DeriveObjectAddressFromObject = 252,
    /// A named object derived from a seed.
    DeriveObjectAddressFromSeed = 254,
    /// A resource account derived from a seed.
    DeriveResourceAccountAddress = 255,
}

impl Scheme {
    /// Returns the raw scheme byte.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Length of an authentication key in bytes.
pub const AUTHENTICATION_KEY_LENGTH: usize = 32;

/// `SHA3-256(public_key_bytes ‖ scheme)`.
///
/// For a freshly created account the authentication key is also the account
/// address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; AUTHENTICATION_KEY_LENGTH]);

impl AuthenticationKey {
    /// Wraps raw authentication key bytes.
    pub const fn new(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives the authentication key for public key bytes under `scheme`.
    pub fn from_public_key(public_key: &[u8], scheme: Scheme) -> Self {
        Self(sha3_256_of([public_key, &[scheme.as_byte()][..]]))
    }

    /// Creates an authentication key from a 32-byte slice.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let key: [u8; AUTHENTICATION_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidAddress(format!(
                "authentication key must be {} bytes, got {}",
                AUTHENTICATION_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Parses hex, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; AUTHENTICATION_KEY_LENGTH] {
        &self.0
    }

    /// Lowercase hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The account address this key derives.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<AuthenticationKey> for AccountAddress {
    fn from(key: AuthenticationKey) -> Self {
        key.account_address()
    }
}
