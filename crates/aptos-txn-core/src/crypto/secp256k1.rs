//! Secp256k1 ECDSA signature scheme implementation.
//!
//! Messages are hashed with SHA3-256 before signing. Signatures are the
//! 64-byte `r ‖ s` form with `s` in the lower half of the curve order;
//! high-S signatures are rejected when parsed.
//!
//! A Secp256k1 key is not an account key on its own. It reaches the chain
//! wrapped in [`AnyPublicKey`](crate::crypto::AnyPublicKey), so this module
//! implements [`VerifyingKey`] but not [`PublicKey`](crate::crypto::PublicKey).

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::traits::{CryptoMaterial, Signature, Signer, VerifyingKey};
use crate::crypto::{decode_hex, sha3_256};
use crate::error::{AptosError, AptosResult};
use libsecp256k1::{Message, RecoveryId};
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

/// Secp256k1 private key length in bytes.
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;
/// Uncompressed Secp256k1 public key length in bytes.
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 65;
/// Compressed Secp256k1 public key length in bytes.
pub const SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;
/// Secp256k1 signature length in bytes.
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

fn prehash(message: &[u8]) -> Message {
    Message::parse(&sha3_256(message))
}

/// A Secp256k1 private key.
#[derive(Clone)]
pub struct Secp256k1PrivateKey {
    inner: libsecp256k1::SecretKey,
}

impl Secp256k1PrivateKey {
    /// Generates a new random private key.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        let mut seed = Zeroizing::new([0u8; SECP256K1_PRIVATE_KEY_LENGTH]);
        loop {
            rng.fill_bytes(&mut seed[..]);
            // Zero and values at or above the curve order are rejected.
            if let Ok(inner) = libsecp256k1::SecretKey::parse(&seed) {
                return Self { inner };
            }
        }
    }

    /// Creates a private key from 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(AptosError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                SECP256K1_PRIVATE_KEY_LENGTH,
                bytes.len()
            )));
        }
        let inner = libsecp256k1::SecretKey::parse_slice(bytes)
            .map_err(|e| AptosError::InvalidPrivateKey(format!("{e:?}")))?;
        Ok(Self { inner })
    }

    /// Creates a private key from hex, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = Zeroizing::new(decode_hex(hex_str)?);
        Self::from_bytes(&bytes)
    }

    /// Returns the private key bytes.
    ///
    /// **Warning**: Handle the returned bytes carefully to avoid leaking
    /// sensitive key material.
    pub fn to_bytes(&self) -> [u8; SECP256K1_PRIVATE_KEY_LENGTH] {
        self.inner.serialize()
    }

    /// Returns the private key as hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.serialize()))
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey {
            inner: libsecp256k1::PublicKey::from_secret_key(&self.inner),
        }
    }

    /// Signs the SHA3-256 digest of `message`.
    pub fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        self.sign_recoverable(message).0
    }

    /// Signs and also returns the recovery id (0 or 1).
    pub fn sign_recoverable(&self, message: &[u8]) -> (Secp256k1Signature, u8) {
        let (signature, recovery_id) = libsecp256k1::sign(&prehash(message), &self.inner);
        (
            Secp256k1Signature { inner: signature },
            recovery_id.serialize(),
        )
    }
}

impl Signer for Secp256k1PrivateKey {
    type Signature = Secp256k1Signature;
    type VerifyingKey = Secp256k1PublicKey;

    fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        Secp256k1PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PrivateKey([REDACTED])")
    }
}

/// A Secp256k1 public key.
///
/// Parses compressed or uncompressed points; always serializes
/// uncompressed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: libsecp256k1::PublicKey,
}

impl Secp256k1PublicKey {
    /// Returns the 33-byte compressed form.
    pub fn to_compressed_bytes(&self) -> [u8; SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH] {
        self.inner.serialize_compressed()
    }
}

impl CryptoMaterial for Secp256k1PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.inner.serialize().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PUBLIC_KEY_LENGTH
            && bytes.len() != SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH
        {
            return Err(AptosError::InvalidPublicKey(format!(
                "expected {} or {} bytes, got {}",
                SECP256K1_PUBLIC_KEY_LENGTH,
                SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH,
                bytes.len()
            )));
        }
        let inner = libsecp256k1::PublicKey::parse_slice(bytes, None)
            .map_err(|e| AptosError::InvalidPublicKey(format!("{e:?}")))?;
        Ok(Self { inner })
    }
}

impl VerifyingKey for Secp256k1PublicKey {
    type Signature = Secp256k1Signature;

    fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        libsecp256k1::verify(&prehash(message), &signature.inner, &self.inner)
    }
}

impl BcsCodec for Secp256k1PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.inner.serialize())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self.to_hex())
    }
}

/// A low-S Secp256k1 ECDSA signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1Signature {
    inner: libsecp256k1::Signature,
}

impl Secp256k1Signature {
    /// Recovers the signer's public key from `message` and a recovery id.
    pub fn recover(&self, message: &[u8], recovery_id: u8) -> AptosResult<Secp256k1PublicKey> {
        let recovery_id = RecoveryId::parse(recovery_id)
            .map_err(|e| AptosError::InvalidSignature(format!("recovery id: {e:?}")))?;
        let inner = libsecp256k1::recover(&prehash(message), &self.inner, &recovery_id)
            .map_err(|e| AptosError::InvalidSignature(format!("{e:?}")))?;
        Ok(Secp256k1PublicKey { inner })
    }
}

impl CryptoMaterial for Secp256k1Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.inner.serialize().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(AptosError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SECP256K1_SIGNATURE_LENGTH,
                bytes.len()
            )));
        }
        let inner = libsecp256k1::Signature::parse_standard_slice(bytes)
            .map_err(|e| AptosError::InvalidSignature(format!("{e:?}")))?;
        if inner.s.is_high() {
            return Err(AptosError::InvalidSignature(
                "s is not in the lower half of the curve order".into(),
            ));
        }
        Ok(Self { inner })
    }
}

impl Signature for Secp256k1Signature {}

impl BcsCodec for Secp256k1Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.inner.serialize())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // n - 1 for secp256k1; s = n - 1 is in the upper half.
    const CURVE_ORDER_MINUS_ONE: &str =
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";

    #[test]
    fn test_generate_and_sign() {
        let private_key = Secp256k1PrivateKey::generate();
        let public_key = private_key.public_key();
        let signature = private_key.sign(b"hello");
        assert!(public_key.verify(b"hello", &signature));
        assert!(!public_key.verify(b"hello?", &signature));
    }

    #[test]
    fn test_signature_is_low_s_and_round_trips() {
        let private_key = Secp256k1PrivateKey::generate();
        let signature = private_key.sign(b"low s");
        let bytes = signature.to_bytes();
        assert_eq!(bytes.len(), SECP256K1_SIGNATURE_LENGTH);
        assert_eq!(Secp256k1Signature::from_bytes(&bytes).unwrap(), signature);
    }

    #[test]
    fn test_high_s_rejected() {
        let mut bytes = vec![0u8; 31];
        bytes.push(1); // r = 1
        bytes.extend(hex::decode(CURVE_ORDER_MINUS_ONE).unwrap());
        assert!(Secp256k1Signature::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_public_key_formats() {
        let private_key = Secp256k1PrivateKey::generate();
        let public_key = private_key.public_key();
        let uncompressed = public_key.to_bytes();
        assert_eq!(uncompressed.len(), SECP256K1_PUBLIC_KEY_LENGTH);
        assert_eq!(uncompressed[0], 0x04);

        let compressed = public_key.to_compressed_bytes();
        assert_eq!(
            Secp256k1PublicKey::from_bytes(&compressed).unwrap(),
            public_key
        );
        assert!(Secp256k1PublicKey::from_bytes(&uncompressed[..64]).is_err());
    }

    #[test]
    fn test_recovery() {
        let private_key = Secp256k1PrivateKey::generate();
        let (signature, recovery_id) = private_key.sign_recoverable(b"recover me");
        assert!(recovery_id <= 1);
        let recovered = signature.recover(b"recover me", recovery_id).unwrap();
        assert_eq!(recovered, private_key.public_key());
        assert!(signature.recover(b"recover me", 9).is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let private_key = Secp256k1PrivateKey::generate();
        let restored = Secp256k1PrivateKey::from_hex(&private_key.to_hex()).unwrap();
        assert_eq!(restored.to_bytes(), private_key.to_bytes());
        assert!(Secp256k1PrivateKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_bcs_layout() {
        let public_key = Secp256k1PrivateKey::generate().public_key();
        let bytes = public_key.to_bcs().unwrap();
        assert_eq!(bytes[0], 65);
        assert_eq!(Secp256k1PublicKey::from_bcs(&bytes).unwrap(), public_key);
    }
}
