//! Ed25519 signature scheme implementation.
//!
//! Ed25519 is the default signature scheme on Aptos. Signing is
//! deterministic (RFC 8032) and verification uses the strict variant that
//! rejects small-order keys and non-canonical signatures.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::traits::{CryptoMaterial, PublicKey, Signature, Signer, VerifyingKey};
use crate::crypto::{decode_hex, AuthenticationKey, Scheme};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use ed25519_dalek::Signer as DalekSigner;
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 private key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 private key.
///
/// The underlying signing key wipes itself when dropped.
#[derive(Clone)]
pub struct Ed25519PrivateKey {
    inner: ed25519_dalek::SigningKey,
}

impl Ed25519PrivateKey {
    /// Generates a new random Ed25519 private key.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Creates a private key from a 32-byte seed.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let seed: Zeroizing<[u8; ED25519_PRIVATE_KEY_LENGTH]> =
            Zeroizing::new(bytes.try_into().map_err(|_| {
                AptosError::InvalidPrivateKey(format!(
                    "expected {} bytes, got {}",
                    ED25519_PRIVATE_KEY_LENGTH,
                    bytes.len()
                ))
            })?);
        Ok(Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&seed),
        })
    }

    /// Creates a private key from a hex seed, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = Zeroizing::new(decode_hex(hex_str)?);
        Self::from_bytes(&bytes)
    }

    /// Returns the 32-byte seed.
    ///
    /// **Warning**: Handle the returned bytes carefully to avoid leaking
    /// sensitive key material.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the seed as hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.to_bytes()))
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature {
            inner: self.inner.sign(message),
        }
    }
}

impl Signer for Ed25519PrivateKey {
    type Signature = Ed25519Signature;
    type VerifyingKey = Ed25519PublicKey;

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey([REDACTED])")
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl Ed25519PublicKey {
    /// Returns the key as a fixed array.
    pub fn to_array(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Derives the account address for this key under the Ed25519 scheme.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }
}

impl CryptoMaterial for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let key_bytes: [u8; ED25519_PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                ED25519_PUBLIC_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        let inner = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| AptosError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl VerifyingKey for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        self.inner.verify_strict(message, &signature.inner).is_ok()
    }
}

impl PublicKey for Ed25519PublicKey {
    const SCHEME: Scheme = Scheme::Ed25519;
}

impl BcsCodec for Ed25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(self.inner.as_bytes())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature {
    inner: ed25519_dalek::Signature,
}

impl CryptoMaterial for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let sig_bytes: [u8; ED25519_SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                ED25519_SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self {
            inner: ed25519_dalek::Signature::from_bytes(&sig_bytes),
        })
    }
}

impl Signature for Ed25519Signature {}

impl BcsCodec for Ed25519Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.inner.to_bytes())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", self.to_hex())
    }
}

impl AuthenticationKey {
    /// Authentication key of a single Ed25519 account.
    pub fn ed25519(public_key: &Ed25519PublicKey) -> Self {
        public_key.authentication_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_HEX: &str = "0x5f7bf6af2e3d40d2a2a7e6d0f8fa8047d9e1a6c3f4b2d8e9a0c1b2d3e4f5a6b7";

    #[test]
    fn test_seed_hex_round_trip() {
        let key = Ed25519PrivateKey::from_hex(SEED_HEX).unwrap();
        assert_eq!(key.to_hex(), SEED_HEX);
        let unprefixed = Ed25519PrivateKey::from_hex(&SEED_HEX[2..]).unwrap();
        assert_eq!(unprefixed.to_bytes(), key.to_bytes());
    }

    #[test]
    fn test_generate_and_sign() {
        let private_key = Ed25519PrivateKey::generate();
        let public_key = private_key.public_key();
        let signature = private_key.sign(b"hello world");
        assert!(public_key.verify(b"hello world", &signature));
        assert!(!public_key.verify(b"hello world!", &signature));
    }

    #[test]
    fn test_deterministic_signatures() {
        let key = Ed25519PrivateKey::from_hex(SEED_HEX).unwrap();
        assert_eq!(key.sign(b"msg"), key.sign(b"msg"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let signer = Ed25519PrivateKey::generate();
        let other = Ed25519PrivateKey::generate();
        let signature = signer.sign(b"payload");
        assert!(!other.public_key().verify(b"payload", &signature));
    }

    #[test]
    fn test_bad_lengths_rejected() {
        assert!(Ed25519PrivateKey::from_bytes(&[0u8; 31]).is_err());
        assert!(Ed25519PublicKey::from_bytes(&[0u8; 33]).is_err());
        assert!(Ed25519Signature::from_bytes(&[0u8; 63]).is_err());
    }

    #[test]
    fn test_bcs_is_length_prefixed() {
        let key = Ed25519PrivateKey::generate();
        let pk_bytes = key.public_key().to_bcs().unwrap();
        assert_eq!(pk_bytes.len(), 33);
        assert_eq!(pk_bytes[0], 32);
        assert_eq!(Ed25519PublicKey::from_bcs(&pk_bytes).unwrap(), key.public_key());

        let sig_bytes = key.sign(b"x").to_bcs().unwrap();
        assert_eq!(sig_bytes.len(), 65);
        assert_eq!(sig_bytes[0], 64);
    }

    #[test]
    fn test_address_derivation() {
        let key = Ed25519PrivateKey::from_hex(SEED_HEX).unwrap();
        let public_key = key.public_key();
        let auth_key = AuthenticationKey::from_public_key(&public_key.to_bytes(), Scheme::Ed25519);
        assert_eq!(public_key.to_address(), auth_key.account_address());
        assert_eq!(AuthenticationKey::ed25519(&public_key), auth_key);
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key = Ed25519PrivateKey::from_hex(SEED_HEX).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&SEED_HEX[2..10]));
    }
}
