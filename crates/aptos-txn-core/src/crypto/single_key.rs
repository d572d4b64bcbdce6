//! Scheme-tagged keys and signatures for single-key accounts.
//!
//! [`AnyPublicKey`] and [`AnySignature`] wrap a concrete key or signature
//! behind a BCS variant tag, which lets one account format carry Ed25519
//! and Secp256k1 keys alike. They are also the members of a
//! [`MultiKeyPublicKey`](crate::crypto::MultiKeyPublicKey).

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::secp256k1::{Secp256k1PublicKey, Secp256k1Signature};
use crate::crypto::traits::{CryptoMaterial, PublicKey, Signature, VerifyingKey};
use crate::crypto::Scheme;
use crate::error::{AptosError, AptosResult, CodecError};
use crate::types::AccountAddress;

const ED25519_VARIANT: u32 = 0;
const SECP256K1_ECDSA_VARIANT: u32 = 1;
// Secp256r1, Keyless and FederatedKeyless are defined on chain but not here.
const UNSUPPORTED_KEY_VARIANTS: std::ops::RangeInclusive<u32> = 2..=4;
// Secp256r1 WebAuthn and Keyless signatures.
const UNSUPPORTED_SIGNATURE_VARIANTS: std::ops::RangeInclusive<u32> = 2..=3;

fn encode_material(serializer: &mut Serializer, variant: u32, bytes: &[u8]) {
    serializer.variant(variant);
    // Key and signature material is always well under the ULEB128 limit.
    serializer.uleb128(bytes.len() as u32);
    serializer.fixed_bytes(bytes);
}

/// A public key tagged with its signature scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyPublicKey {
    /// An Ed25519 key.
    Ed25519(Ed25519PublicKey),
    /// A Secp256k1 ECDSA key.
    Secp256k1Ecdsa(Secp256k1PublicKey),
}

impl AnyPublicKey {
    /// Wraps an Ed25519 key.
    pub fn ed25519(public_key: Ed25519PublicKey) -> Self {
        Self::Ed25519(public_key)
    }

    /// Wraps a Secp256k1 key.
    pub fn secp256k1(public_key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1Ecdsa(public_key)
    }

    /// The BCS variant index of this key.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::Ed25519(_) => ED25519_VARIANT,
            Self::Secp256k1Ecdsa(_) => SECP256K1_ECDSA_VARIANT,
        }
    }

    /// Derives the account address under the single-key scheme.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }

    fn encode(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519(pk) => encode_material(serializer, ED25519_VARIANT, &pk.to_bytes()),
            Self::Secp256k1Ecdsa(pk) => {
                encode_material(serializer, SECP256K1_ECDSA_VARIANT, &pk.to_bytes())
            }
        }
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(public_key: Ed25519PublicKey) -> Self {
        Self::Ed25519(public_key)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(public_key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1Ecdsa(public_key)
    }
}

impl CryptoMaterial for AnyPublicKey {
    /// The BCS encoding, tag included.
    fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.encode(&mut serializer);
        serializer.into_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Self::from_bcs(bytes)
    }
}

impl VerifyingKey for AnyPublicKey {
    type Signature = AnySignature;

    fn verify(&self, message: &[u8], signature: &AnySignature) -> bool {
        match (self, signature) {
            (Self::Ed25519(pk), AnySignature::Ed25519(sig)) => pk.verify(message, sig),
            (Self::Secp256k1Ecdsa(pk), AnySignature::Secp256k1Ecdsa(sig)) => {
                pk.verify(message, sig)
            }
            _ => false,
        }
    }
}

impl PublicKey for AnyPublicKey {
    const SCHEME: Scheme = Scheme::SingleKey;
}

impl BcsCodec for AnyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.encode(serializer);
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            ED25519_VARIANT => Ok(Self::Ed25519(deserializer.value()?)),
            SECP256K1_ECDSA_VARIANT => Ok(Self::Secp256k1Ecdsa(deserializer.value()?)),
            index if UNSUPPORTED_KEY_VARIANTS.contains(&index) => Err(CodecError::Unsupported {
                type_name: "AnyPublicKey",
                index,
            }
            .into()),
            index => Err(CodecError::unknown_variant("AnyPublicKey", index).into()),
        }
    }
}

/// A signature tagged with its signature scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnySignature {
    /// An Ed25519 signature.
    Ed25519(Ed25519Signature),
    /// A Secp256k1 ECDSA signature.
    Secp256k1Ecdsa(Secp256k1Signature),
}

impl AnySignature {
    /// The BCS variant index of this signature.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::Ed25519(_) => ED25519_VARIANT,
            Self::Secp256k1Ecdsa(_) => SECP256K1_ECDSA_VARIANT,
        }
    }

    fn encode(&self, serializer: &mut Serializer) {
        match self {
            Self::Ed25519(sig) => encode_material(serializer, ED25519_VARIANT, &sig.to_bytes()),
            Self::Secp256k1Ecdsa(sig) => {
                encode_material(serializer, SECP256K1_ECDSA_VARIANT, &sig.to_bytes())
            }
        }
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(signature: Ed25519Signature) -> Self {
        Self::Ed25519(signature)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(signature: Secp256k1Signature) -> Self {
        Self::Secp256k1Ecdsa(signature)
    }
}

impl CryptoMaterial for AnySignature {
    fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.encode(&mut serializer);
        serializer.into_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Self::from_bcs(bytes)
    }
}

impl Signature for AnySignature {}

impl BcsCodec for AnySignature {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.encode(serializer);
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.variant()? {
            ED25519_VARIANT => Ok(Self::Ed25519(deserializer.value()?)),
            SECP256K1_ECDSA_VARIANT => Ok(Self::Secp256k1Ecdsa(deserializer.value()?)),
            index if UNSUPPORTED_SIGNATURE_VARIANTS.contains(&index) => {
                Err(CodecError::Unsupported {
                    type_name: "AnySignature",
                    index,
                }
                .into())
            }
            index => Err(CodecError::unknown_variant("AnySignature", index).into()),
        }
    }
}

/// A single-key public key together with its signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleKeyAuthenticator {
    public_key: AnyPublicKey,
    signature: AnySignature,
}

impl SingleKeyAuthenticator {
    /// Pairs a key with a signature. The pairing is not checked here.
    pub fn new(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// The signing key.
    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    /// The signature.
    pub fn signature(&self) -> &AnySignature {
        &self.signature
    }

    /// Returns true if the signature is valid for `message`.
    ///
    /// A key and signature of different schemes never verify.
    pub fn verify(&self, message: &[u8]) -> bool {
        self.public_key.verify(message, &self.signature)
    }
}

impl BcsCodec for SingleKeyAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.value(&self.public_key)?;
        serializer.value(&self.signature)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            public_key: deserializer.value()?,
            signature: deserializer.value()?,
        })
    }
}

impl TryFrom<AnyPublicKey> for Ed25519PublicKey {
    type Error = AptosError;

    fn try_from(public_key: AnyPublicKey) -> AptosResult<Self> {
        match public_key {
            AnyPublicKey::Ed25519(pk) => Ok(pk),
            other => Err(AptosError::InvalidPublicKey(format!(
                "expected an Ed25519 key, found variant {}",
                other.variant_index()
            ))),
        }
    }
}
