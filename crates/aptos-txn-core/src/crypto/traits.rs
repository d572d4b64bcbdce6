//! Cryptographic traits.
//!
//! Keys and signatures share one capability set: raw bytes and hex in both
//! directions, plus BCS via [`BcsCodec`]. Verification always answers with a
//! `bool`; a malformed or mismatched signature is simply `false`.

use crate::codec::BcsCodec;
use crate::crypto::{decode_hex, AuthenticationKey, Scheme};
use crate::error::AptosResult;

/// Byte-level representation shared by keys and signatures.
pub trait CryptoMaterial: Sized {
    /// Returns the canonical bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Parses canonical bytes, validating length and encoding.
    fn from_bytes(bytes: &[u8]) -> AptosResult<Self>;

    /// Returns the bytes as lowercase hex with a `0x` prefix.
    fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Parses hex, with or without a `0x` prefix.
    fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }
}

/// Marker for signature types.
pub trait Signature: CryptoMaterial + BcsCodec + Clone + PartialEq + std::fmt::Debug {}

/// A key that can check signatures.
pub trait VerifyingKey: CryptoMaterial + BcsCodec + Clone + PartialEq + std::fmt::Debug {
    /// The signature type this key verifies.
    type Signature: Signature;

    /// Returns true if `signature` is valid for `message` under this key.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool;
}

/// A verifying key that can stand alone as an on-chain account key.
pub trait PublicKey: VerifyingKey {
    /// The authentication key scheme of this key type.
    const SCHEME: Scheme;

    /// Derives the authentication key for this public key.
    fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.to_bytes(), Self::SCHEME)
    }
}

/// A private key that produces signatures.
pub trait Signer {
    /// The signature type produced by this signer.
    type Signature: Signature;
    /// The matching verifying key.
    type VerifyingKey: VerifyingKey<Signature = Self::Signature>;

    /// Signs the given message.
    fn sign(&self, message: &[u8]) -> Self::Signature;

    /// Returns the verifying key for this signer.
    fn public_key(&self) -> Self::VerifyingKey;
}
