//! On-chain k-of-n threshold keys over mixed signature schemes.
//!
//! A [`MultiKeyPublicKey`] is an ordered list of [`AnyPublicKey`]s plus the
//! number of signatures required. A [`MultiKeySignature`] carries the
//! signatures of the participating keys in key order, together with a
//! [`MultiKeyBitmap`] naming those keys.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::bitmap::{MultiKeyBitmap, MAX_BITMAP_INDICES};
use crate::crypto::single_key::{AnyPublicKey, AnySignature, SingleKeyAuthenticator};
use crate::crypto::traits::{CryptoMaterial, PublicKey, Signature, VerifyingKey};
use crate::crypto::Scheme;
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;

/// A k-of-n key whose members may use different schemes.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiKeyPublicKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKeyPublicKey {
    /// Creates a multi-key requiring `signatures_required` of `public_keys`.
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> AptosResult<Self> {
        if public_keys.is_empty() {
            return Err(AptosError::InvalidPublicKey(
                "multi-key requires at least one public key".into(),
            ));
        }
        if public_keys.len() > MAX_BITMAP_INDICES as usize {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-key supports at most {} keys, got {}",
                MAX_BITMAP_INDICES,
                public_keys.len()
            )));
        }
        if signatures_required == 0 || signatures_required as usize > public_keys.len() {
            return Err(AptosError::InvalidPublicKey(format!(
                "signatures required {} must be between 1 and {}",
                signatures_required,
                public_keys.len()
            )));
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    /// The member keys in index order.
    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    /// The member key at `index`.
    pub fn get(&self, index: usize) -> Option<&AnyPublicKey> {
        self.public_keys.get(index)
    }

    /// The number of signatures required.
    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    /// Derives the account address under the multi-key scheme.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }

    fn encode(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.sequence(&self.public_keys)?;
        serializer.u8(self.signatures_required);
        Ok(())
    }
}

impl CryptoMaterial for MultiKeyPublicKey {
    /// The BCS encoding.
    fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        // At most 32 keys, so the length prefix cannot overflow.
        let _ = self.encode(&mut serializer);
        serializer.into_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Self::from_bcs(bytes)
    }
}

impl VerifyingKey for MultiKeyPublicKey {
    type Signature = MultiKeySignature;

    /// Checks every signature against the key its bitmap index names.
    ///
    /// Fails when the bitmap and signature counts disagree, when fewer
    /// signatures than required are present, when an index has no key, or
    /// when any single signature does not verify.
    fn verify(&self, message: &[u8], signature: &MultiKeySignature) -> bool {
        let indices = signature.bitmap.indices();
        if signature.signatures.len() != indices.len() {
            return false;
        }
        if (self.signatures_required as usize) > signature.signatures.len() {
            return false;
        }
        indices
            .iter()
            .zip(signature.signatures.iter())
            .all(|(index, sig)| match self.public_keys.get(*index as usize) {
                Some(key) => SingleKeyAuthenticator::new(key.clone(), sig.clone()).verify(message),
                None => false,
            })
    }
}

impl PublicKey for MultiKeyPublicKey {
    const SCHEME: Scheme = Scheme::MultiKey;
}

impl BcsCodec for MultiKeyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.encode(serializer)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let public_keys = deserializer.sequence()?;
        let signatures_required = deserializer.u8()?;
        Self::new(public_keys, signatures_required)
    }
}

impl fmt::Debug for MultiKeyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiKeyPublicKey({}-of-{})",
            self.signatures_required,
            self.public_keys.len()
        )
    }
}

/// Signatures from a subset of a [`MultiKeyPublicKey`]'s members.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: MultiKeyBitmap,
}

impl MultiKeySignature {
    /// Creates a signature from `(key index, signature)` pairs in any order.
    pub fn new(mut signatures: Vec<(u8, AnySignature)>) -> AptosResult<Self> {
        if signatures.is_empty() {
            return Err(AptosError::InvalidSignature(
                "multi-key signature requires at least one signature".into(),
            ));
        }
        signatures.sort_by_key(|(index, _)| *index);
        let mut bitmap = MultiKeyBitmap::new();
        for (index, _) in &signatures {
            bitmap.add(*index)?;
        }
        Ok(Self {
            signatures: signatures.into_iter().map(|(_, sig)| sig).collect(),
            bitmap,
        })
    }

    /// Assembles a signature from parts as they appear on the wire.
    ///
    /// The counts are not reconciled here; a mismatch fails verification.
    pub fn from_parts(signatures: Vec<AnySignature>, bitmap: MultiKeyBitmap) -> Self {
        Self { signatures, bitmap }
    }

    /// The signatures in key order.
    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    /// The participation bitmap.
    pub fn bitmap(&self) -> &MultiKeyBitmap {
        &self.bitmap
    }

    /// Number of signatures carried.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    fn encode(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.sequence(&self.signatures)?;
        serializer.value(&self.bitmap)
    }
}

impl CryptoMaterial for MultiKeySignature {
    /// The BCS encoding.
    fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        // Only a length prefix past u32::MAX can fail, and no signature
        // list gets near that.
        let _ = self.encode(&mut serializer);
        serializer.into_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Self::from_bcs(bytes)
    }
}

impl Signature for MultiKeySignature {}

impl BcsCodec for MultiKeySignature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.encode(serializer)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            signatures: deserializer.sequence()?,
            bitmap: deserializer.value()?,
        })
    }
}

impl fmt::Debug for MultiKeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiKeySignature(signers: {:?})", self.bitmap.indices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};

    struct Members {
        ed: Ed25519PrivateKey,
        secp: Secp256k1PrivateKey,
        ed2: Ed25519PrivateKey,
    }

    impl Members {
        fn new() -> Self {
            Self {
                ed: Ed25519PrivateKey::generate(),
                secp: Secp256k1PrivateKey::generate(),
                ed2: Ed25519PrivateKey::generate(),
            }
        }

        fn public_key(&self, required: u8) -> MultiKeyPublicKey {
            MultiKeyPublicKey::new(
                vec![
                    self.ed.public_key().into(),
                    self.secp.public_key().into(),
                    self.ed2.public_key().into(),
                ],
                required,
            )
            .unwrap()
        }

        fn sign(&self, index: u8, message: &[u8]) -> (u8, AnySignature) {
            let sig = match index {
                0 => self.ed.sign(message).into(),
                1 => self.secp.sign(message).into(),
                _ => self.ed2.sign(message).into(),
            };
            (index, sig)
        }
    }

    #[test]
    fn test_new_validation() {
        let key: AnyPublicKey = Ed25519PrivateKey::generate().public_key().into();
        assert!(MultiKeyPublicKey::new(vec![], 1).is_err());
        assert!(MultiKeyPublicKey::new(vec![key.clone()], 0).is_err());
        assert!(MultiKeyPublicKey::new(vec![key.clone()], 2).is_err());
        assert!(MultiKeyPublicKey::new(vec![key; 33], 1).is_err());
    }

    #[test]
    fn test_mixed_scheme_threshold() {
        let members = Members::new();
        let public_key = members.public_key(2);
        let message = b"mixed";

        let sig = MultiKeySignature::new(vec![
            members.sign(2, message),
            members.sign(1, message),
        ])
        .unwrap();
        assert_eq!(sig.bitmap().indices(), vec![1, 2]);
        assert!(public_key.verify(message, &sig));
        assert!(!public_key.verify(b"other", &sig));

        let short = MultiKeySignature::new(vec![members.sign(0, message)]).unwrap();
        assert!(!public_key.verify(message, &short));
    }

    #[test]
    fn test_signature_bytes_are_bcs() {
        let members = Members::new();
        let sig = MultiKeySignature::new(vec![
            members.sign(0, b"m"),
            members.sign(1, b"m"),
        ])
        .unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(bytes, sig.to_bcs().unwrap());
        assert_eq!(MultiKeySignature::from_bytes(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_wrong_index_fails() {
        let members = Members::new();
        let public_key = members.public_key(1);
        let (_, sig) = members.sign(0, b"m");
        let misplaced = MultiKeySignature::new(vec![(2, sig)]).unwrap();
        assert!(!public_key.verify(b"m", &misplaced));
    }

    #[test]
    fn test_any_bad_signature_fails() {
        let members = Members::new();
        let public_key = members.public_key(1);
        let (_, bad) = members.sign(1, b"different");
        let sig = MultiKeySignature::new(vec![members.sign(0, b"m"), (1, bad)]).unwrap();
        assert!(!public_key.verify(b"m", &sig));
    }

    #[test]
    fn test_count_mismatch_fails_closed() {
        let members = Members::new();
        let public_key = members.public_key(1);
        let (_, sig) = members.sign(0, b"m");
        let bitmap = MultiKeyBitmap::from_indices(&[0, 1]).unwrap();
        let mismatched = MultiKeySignature::from_parts(vec![sig], bitmap);
        assert!(!public_key.verify(b"m", &mismatched));
    }

    #[test]
    fn test_index_beyond_keys_fails() {
        let members = Members::new();
        let public_key = members.public_key(1);
        let (_, sig) = members.sign(0, b"m");
        let far = MultiKeySignature::new(vec![(7, sig)]).unwrap();
        assert!(!public_key.verify(b"m", &far));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let members = Members::new();
        let first = members.sign(0, b"m");
        let again = members.sign(0, b"m");
        assert!(MultiKeySignature::new(vec![first, again]).is_err());
    }

    #[test]
    fn test_bcs_round_trip() {
        let members = Members::new();
        let public_key = members.public_key(2);
        let bytes = public_key.to_bcs().unwrap();
        assert_eq!(bytes[0], 3);
        assert_eq!(*bytes.last().unwrap(), 2);
        assert_eq!(public_key.to_bytes(), bytes);
        assert_eq!(MultiKeyPublicKey::from_bcs(&bytes).unwrap(), public_key);

        let sig = MultiKeySignature::new(vec![members.sign(0, b"x"), members.sign(2, b"x")]).unwrap();
        let sig_bytes = sig.to_bcs().unwrap();
        assert_eq!(&sig_bytes[sig_bytes.len() - 2..], &[1, 0b1010_0000]);
        assert_eq!(MultiKeySignature::from_bcs(&sig_bytes).unwrap(), sig);
    }

    #[test]
    fn test_address_uses_multi_key_scheme() {
        let members = Members::new();
        let public_key = members.public_key(2);
        let expected = crate::crypto::AuthenticationKey::from_public_key(
            &public_key.to_bytes(),
            Scheme::MultiKey,
        );
        assert_eq!(public_key.to_address(), expected.account_address());
    }
}
