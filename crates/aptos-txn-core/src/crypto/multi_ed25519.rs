//! Legacy k-of-n Ed25519 multi-signatures.
//!
//! The public key is up to 32 Ed25519 keys followed by a one-byte
//! threshold. A signature lists the contributing Ed25519 signatures in
//! key order, followed by a 4-byte bitmap whose bit `i` (most significant
//! bit of byte 0 is bit 0) marks key `i` as a signer.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::ed25519::{
    Ed25519PublicKey, Ed25519Signature, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
use crate::crypto::traits::{CryptoMaterial, PublicKey, Signature, VerifyingKey};
use crate::crypto::Scheme;
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;

/// Maximum number of keys in a multi-Ed25519 public key.
pub const MAX_NUM_OF_KEYS: usize = 32;

/// Length of the signer bitmap in bytes.
pub const BITMAP_NUM_OF_BYTES: usize = 4;

/// A k-of-n Ed25519 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Creates a multi-key requiring `threshold` of `public_keys` to sign.
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> AptosResult<Self> {
        if public_keys.is_empty() {
            return Err(AptosError::InvalidPublicKey(
                "multi-Ed25519 requires at least one public key".into(),
            ));
        }
        if public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-Ed25519 supports at most {} keys, got {}",
                MAX_NUM_OF_KEYS,
                public_keys.len()
            )));
        }
        if threshold == 0 || threshold as usize > public_keys.len() {
            return Err(AptosError::InvalidPublicKey(format!(
                "threshold {} must be between 1 and {}",
                threshold,
                public_keys.len()
            )));
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    /// The member keys in signing order.
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// The number of signatures required.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Derives the account address under the multi-Ed25519 scheme.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }
}

impl CryptoMaterial for MultiEd25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1);
        for key in &self.public_keys {
            bytes.extend_from_slice(&key.to_array());
        }
        bytes.push(self.threshold);
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let Some((threshold, keys)) = bytes.split_last() else {
            return Err(AptosError::InvalidPublicKey(
                "empty multi-Ed25519 public key".into(),
            ));
        };
        if keys.len() % ED25519_PUBLIC_KEY_LENGTH != 0 {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-Ed25519 key material of {} bytes is not a multiple of {}",
                keys.len(),
                ED25519_PUBLIC_KEY_LENGTH
            )));
        }
        let public_keys = keys
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;
        Self::new(public_keys, *threshold)
    }
}

impl VerifyingKey for MultiEd25519PublicKey {
    type Signature = MultiEd25519Signature;

    /// Pairs each signature with the key at its bitmap position and passes
    /// once at least `threshold` of them verify.
    fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        let valid = signature
            .signers()
            .filter(|(index, sig)| {
                self.public_keys
                    .get(*index as usize)
                    .is_some_and(|key| key.verify(message, sig))
            })
            .count();
        valid >= self.threshold as usize
    }
}

impl PublicKey for MultiEd25519PublicKey {
    const SCHEME: Scheme = Scheme::MultiEd25519;
}

impl BcsCodec for MultiEd25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.to_bytes())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519PublicKey({}-of-{})",
            self.threshold,
            self.public_keys.len()
        )
    }
}

/// A k-of-n Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: [u8; BITMAP_NUM_OF_BYTES],
}

fn bit_mask(index: u8) -> (usize, u8) {
    ((index / 8) as usize, 0b1000_0000 >> (index % 8))
}

impl MultiEd25519Signature {
    /// Creates a signature from `(key index, signature)` pairs.
    ///
    /// Pairs may arrive in any order; they are stored in key order.
    pub fn new(mut signatures: Vec<(u8, Ed25519Signature)>) -> AptosResult<Self> {
        if signatures.is_empty() {
            return Err(AptosError::InvalidSignature(
                "multi-Ed25519 signature requires at least one signature".into(),
            ));
        }
        signatures.sort_by_key(|(index, _)| *index);

        let mut bitmap = [0u8; BITMAP_NUM_OF_BYTES];
        for (index, _) in &signatures {
            if *index as usize >= MAX_NUM_OF_KEYS {
                return Err(AptosError::InvalidSignature(format!(
                    "signer index {index} out of range"
                )));
            }
            let (byte, mask) = bit_mask(*index);
            if bitmap[byte] & mask != 0 {
                return Err(AptosError::InvalidSignature(format!(
                    "duplicate signature for index {index}"
                )));
            }
            bitmap[byte] |= mask;
        }

        Ok(Self {
            signatures: signatures.into_iter().map(|(_, sig)| sig).collect(),
            bitmap,
        })
    }

    /// Creates a signature from one optional slot per key, in key order.
    pub fn from_slots(slots: Vec<Option<Ed25519Signature>>) -> AptosResult<Self> {
        if slots.len() > MAX_NUM_OF_KEYS {
            return Err(AptosError::InvalidSignature(format!(
                "{} signature slots exceed the maximum of {}",
                slots.len(),
                MAX_NUM_OF_KEYS
            )));
        }
        Self::new(
            slots
                .into_iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.map(|sig| (index as u8, sig)))
                .collect(),
        )
    }

    /// Indices of the signing keys in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..MAX_NUM_OF_KEYS as u8)
            .filter(|index| {
                let (byte, mask) = bit_mask(*index);
                self.bitmap[byte] & mask != 0
            })
            .collect()
    }

    /// `(key index, signature)` pairs in key order.
    pub fn signers(&self) -> impl Iterator<Item = (u8, &Ed25519Signature)> {
        self.indices().into_iter().zip(self.signatures.iter())
    }

    /// The contributing signatures in key order.
    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    /// The raw 4-byte bitmap.
    pub fn bitmap(&self) -> [u8; BITMAP_NUM_OF_BYTES] {
        self.bitmap
    }
}

impl CryptoMaterial for MultiEd25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_NUM_OF_BYTES);
        for sig in &self.signatures {
            bytes.extend_from_slice(&sig.to_bytes());
        }
        bytes.extend_from_slice(&self.bitmap);
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() < BITMAP_NUM_OF_BYTES {
            return Err(AptosError::InvalidSignature(
                "multi-Ed25519 signature is missing its bitmap".into(),
            ));
        }
        let (sig_bytes, bitmap_bytes) = bytes.split_at(bytes.len() - BITMAP_NUM_OF_BYTES);
        if sig_bytes.len() % ED25519_SIGNATURE_LENGTH != 0 {
            return Err(AptosError::InvalidSignature(format!(
                "signature material of {} bytes is not a multiple of {}",
                sig_bytes.len(),
                ED25519_SIGNATURE_LENGTH
            )));
        }
        let signatures = sig_bytes
            .chunks_exact(ED25519_SIGNATURE_LENGTH)
            .map(Ed25519Signature::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;

        let mut bitmap = [0u8; BITMAP_NUM_OF_BYTES];
        bitmap.copy_from_slice(bitmap_bytes);
        let set_bits: u32 = bitmap.iter().map(|b| b.count_ones()).sum();
        if set_bits as usize != signatures.len() {
            return Err(AptosError::InvalidSignature(format!(
                "bitmap marks {} signers but {} signatures are present",
                set_bits,
                signatures.len()
            )));
        }
        Ok(Self { signatures, bitmap })
    }
}

impl Signature for MultiEd25519Signature {}

impl BcsCodec for MultiEd25519Signature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(&self.to_bytes())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519Signature(signers: {:?})", self.indices())
    }
}
