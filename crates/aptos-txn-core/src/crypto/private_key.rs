//! Scheme-tagged private keys and the AIP-80 text format.

use crate::crypto::ed25519::Ed25519PrivateKey;
use crate::crypto::secp256k1::Secp256k1PrivateKey;
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::error::{AptosError, AptosResult};
use std::fmt;
use std::str::FromStr;

/// AIP-80 prefix for Ed25519 private keys.
pub const ED25519_PRIVATE_KEY_PREFIX: &str = "ed25519-priv-";
/// AIP-80 prefix for Secp256k1 private keys.
pub const SECP256K1_PRIVATE_KEY_PREFIX: &str = "secp256k1-priv-";

/// A private key of either supported scheme.
#[derive(Clone)]
pub enum AnyPrivateKey {
    /// An Ed25519 key.
    Ed25519(Ed25519PrivateKey),
    /// A Secp256k1 key.
    Secp256k1(Secp256k1PrivateKey),
}

impl AnyPrivateKey {
    /// Parses a private key string.
    ///
    /// Accepts `ed25519-priv-0x…` and `secp256k1-priv-0x…`. A bare hex
    /// string, with or without `0x`, is read as an Ed25519 seed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aptos_txn_core::crypto::AnyPrivateKey;
    ///
    /// let key = AnyPrivateKey::from_aip80(
    ///     "secp256k1-priv-0x0000000000000000000000000000000000000000000000000000000000000001",
    /// )
    /// .unwrap();
    /// assert!(matches!(key, AnyPrivateKey::Secp256k1(_)));
    /// ```
    pub fn from_aip80(s: &str) -> AptosResult<Self> {
        let s = s.trim();
        if let Some(hex_part) = s.strip_prefix(ED25519_PRIVATE_KEY_PREFIX) {
            Ok(Self::Ed25519(Ed25519PrivateKey::from_hex(hex_part)?))
        } else if let Some(hex_part) = s.strip_prefix(SECP256K1_PRIVATE_KEY_PREFIX) {
            Ok(Self::Secp256k1(Secp256k1PrivateKey::from_hex(hex_part)?))
        } else if s.contains("-priv-") {
            Err(AptosError::InvalidPrivateKey(format!(
                "unsupported AIP-80 prefix in '{}'",
                s.split("-priv-").next().unwrap_or_default()
            )))
        } else {
            Ok(Self::Ed25519(Ed25519PrivateKey::from_hex(s)?))
        }
    }

    /// Formats the key as an AIP-80 string.
    pub fn to_aip80(&self) -> String {
        match self {
            Self::Ed25519(key) => format!("{}{}", ED25519_PRIVATE_KEY_PREFIX, key.to_hex()),
            Self::Secp256k1(key) => format!("{}{}", SECP256K1_PRIVATE_KEY_PREFIX, key.to_hex()),
        }
    }

    /// The public key, tagged with its scheme.
    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(key) => AnyPublicKey::Ed25519(key.public_key()),
            Self::Secp256k1(key) => AnyPublicKey::Secp256k1Ecdsa(key.public_key()),
        }
    }

    /// Signs `message`, tagging the signature with its scheme.
    pub fn sign(&self, message: &[u8]) -> AnySignature {
        match self {
            Self::Ed25519(key) => AnySignature::Ed25519(key.sign(message)),
            Self::Secp256k1(key) => AnySignature::Secp256k1Ecdsa(key.sign(message)),
        }
    }
}

impl From<Ed25519PrivateKey> for AnyPrivateKey {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PrivateKey> for AnyPrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }
}

impl FromStr for AnyPrivateKey {
    type Err = AptosError;

    fn from_str(s: &str) -> AptosResult<Self> {
        Self::from_aip80(s)
    }
}

impl fmt::Debug for AnyPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(key) => write!(f, "AnyPrivateKey::{key:?}"),
            Self::Secp256k1(key) => write!(f, "AnyPrivateKey::{key:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::VerifyingKey;

    const SEED: &str = "0x5f7bf6af2e3d40d2a2a7e6d0f8fa8047d9e1a6c3f4b2d8e9a0c1b2d3e4f5a6b7";

    #[test]
    fn test_parse_prefixes() {
        let ed = AnyPrivateKey::from_aip80(&format!("ed25519-priv-{SEED}")).unwrap();
        assert!(matches!(ed, AnyPrivateKey::Ed25519(_)));

        let secp = AnyPrivateKey::from_aip80(&format!("secp256k1-priv-{SEED}")).unwrap();
        assert!(matches!(secp, AnyPrivateKey::Secp256k1(_)));
    }

    #[test]
    fn test_bare_hex_defaults_to_ed25519() {
        let bare: AnyPrivateKey = SEED.parse().unwrap();
        let unprefixed: AnyPrivateKey = SEED[2..].parse().unwrap();
        assert!(matches!(bare, AnyPrivateKey::Ed25519(_)));
        assert_eq!(bare.to_aip80(), unprefixed.to_aip80());
    }

    #[test]
    fn test_aip80_round_trip() {
        for key in [
            AnyPrivateKey::from(Ed25519PrivateKey::generate()),
            AnyPrivateKey::from(Secp256k1PrivateKey::generate()),
        ] {
            let text = key.to_aip80();
            let parsed = AnyPrivateKey::from_aip80(&text).unwrap();
            assert_eq!(parsed.to_aip80(), text);
            assert_eq!(parsed.public_key(), key.public_key());
        }
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        assert!(AnyPrivateKey::from_aip80(&format!("secp256r1-priv-{SEED}")).is_err());
        assert!(AnyPrivateKey::from_aip80("not hex").is_err());
    }

    #[test]
    fn test_sign_matches_public_key() {
        let key = AnyPrivateKey::from_aip80(&format!("secp256k1-priv-{SEED}")).unwrap();
        let signature = key.sign(b"any");
        assert!(key.public_key().verify(b"any", &signature));
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
