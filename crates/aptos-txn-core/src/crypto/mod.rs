//! Signature schemes and key material.
//!
//! Ed25519 and Secp256k1 are the base schemes. MultiEd25519 is the legacy
//! k-of-n Ed25519 account type, and MultiKey is its successor that mixes
//! schemes through [`AnyPublicKey`] and [`AnySignature`].
//!
//! # Example
//!
//! ```rust
//! use aptos_txn_core::crypto::{Ed25519PrivateKey, VerifyingKey};
//!
//! let private_key = Ed25519PrivateKey::generate();
//! let signature = private_key.sign(b"hello world");
//! assert!(private_key.public_key().verify(b"hello world", &signature));
//! ```

mod authentication_key;
mod bitmap;
mod ed25519;
mod hash;
mod multi_ed25519;
mod multi_key;
mod private_key;
mod secp256k1;
mod single_key;
mod traits;

pub use authentication_key::{AuthenticationKey, Scheme, AUTHENTICATION_KEY_LENGTH};
pub use bitmap::{MultiKeyBitmap, MAX_BITMAP_INDICES};
pub use ed25519::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use hash::{
    domain_separation_hash, raw_transaction_salt, raw_transaction_with_data_salt, sha3_256,
    sha3_256_of, transaction_salt, HASH_PREFIX,
};
pub use multi_ed25519::{
    MultiEd25519PublicKey, MultiEd25519Signature, BITMAP_NUM_OF_BYTES, MAX_NUM_OF_KEYS,
};
pub use multi_key::{MultiKeyPublicKey, MultiKeySignature};
pub use private_key::{AnyPrivateKey, ED25519_PRIVATE_KEY_PREFIX, SECP256K1_PRIVATE_KEY_PREFIX};
pub use secp256k1::{
    Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature,
    SECP256K1_COMPRESSED_PUBLIC_KEY_LENGTH, SECP256K1_PRIVATE_KEY_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
pub use single_key::{AnyPublicKey, AnySignature, SingleKeyAuthenticator};
pub use traits::{CryptoMaterial, PublicKey, Signature, Signer, VerifyingKey};

use crate::error::AptosResult;

/// Decodes hex with an optional `0x`/`0X` prefix, in either case.
pub fn decode_hex(s: &str) -> AptosResult<Vec<u8>> {
    let stripped = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    Ok(hex::decode(stripped)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_prefixes() {
        assert_eq!(decode_hex("0xAbCd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("0XABCD").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("abcd").unwrap(), vec![0xab, 0xcd]);
        assert!(decode_hex("").unwrap().is_empty());
        assert!(decode_hex("0xabc").is_err());
        assert!(decode_hex("zz").is_err());
    }
}
