//! SHA3-256 helpers and domain-separated prefixes.
//!
//! Every signed structure is hashed under a salt of the form
//! `SHA3-256("APTOS::" ‖ type_name)`. The salts are computed once and cached.

use once_cell::sync::Lazy;
use sha3::{Digest, Sha3_256};

/// Prefix prepended to every hashing salt.
pub const HASH_PREFIX: &str = "APTOS::";

static RAW_TRANSACTION_SALT: Lazy<[u8; 32]> = Lazy::new(|| domain_separation_hash("RawTransaction"));

static RAW_TRANSACTION_WITH_DATA_SALT: Lazy<[u8; 32]> =
    Lazy::new(|| domain_separation_hash("RawTransactionWithData"));

static TRANSACTION_SALT: Lazy<[u8; 32]> = Lazy::new(|| domain_separation_hash("Transaction"));

/// Computes the SHA3-256 hash of `data`.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    sha3_256_of([data])
}

/// Computes the SHA3-256 hash of several byte strings concatenated.
pub fn sha3_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha3_256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// `SHA3-256("APTOS::" ‖ type_name)`.
pub fn domain_separation_hash(type_name: &str) -> [u8; 32] {
    sha3_256_of([HASH_PREFIX.as_bytes(), type_name.as_bytes()])
}

/// Salt for single-signer transaction signing messages.
pub fn raw_transaction_salt() -> &'static [u8; 32] {
    &RAW_TRANSACTION_SALT
}

/// Salt for multi-agent and fee-payer signing messages.
pub fn raw_transaction_with_data_salt() -> &'static [u8; 32] {
    &RAW_TRANSACTION_WITH_DATA_SALT
}

/// Salt for transaction hashes.
pub fn transaction_salt() -> &'static [u8; 32] {
    &TRANSACTION_SALT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_known_vector() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_sha3_256_of_concatenates() {
        assert_eq!(
            sha3_256(b"helloworld"),
            sha3_256_of([b"hello".as_slice(), b"world".as_slice()])
        );
    }

    #[test]
    fn test_salts_are_cached_and_distinct() {
        assert_eq!(raw_transaction_salt(), &sha3_256(b"APTOS::RawTransaction"));
        assert!(std::ptr::eq(raw_transaction_salt(), raw_transaction_salt()));
        assert_ne!(raw_transaction_salt(), raw_transaction_with_data_salt());
        assert_eq!(transaction_salt(), &sha3_256(b"APTOS::Transaction"));
    }
}
