//! Transaction digests.

use crate::crypto::sha3_256;
use crate::error::{AptosError, AptosResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Digest size of SHA3-256.
pub const HASH_LENGTH: usize = 32;

/// A SHA3-256 digest, shown and serialized as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    #[allow(missing_docs)]
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Hashes `data` with SHA3-256.
    pub fn sha3_256<T: AsRef<[u8]>>(data: T) -> Self {
        Self(sha3_256(data.as_ref()))
    }

    /// Parses exactly 64 hex digits, with or without `0x`.
    pub fn from_hex<T: AsRef<str>>(hex_str: T) -> AptosResult<Self> {
        let hex_str = hex_str.as_ref();
        let digits = hex_str
            .strip_prefix("0x")
            .or_else(|| hex_str.strip_prefix("0X"))
            .unwrap_or(hex_str);
        let mut hash = [0u8; HASH_LENGTH];
        hex::decode_to_slice(digits, &mut hash)?;
        Ok(Self(hash))
    }

    #[allow(missing_docs)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashValue").field(&format_args!("{self}")).finish()
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl FromStr for HashValue {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let hash = HashValue::sha3_256(b"aptos");
        assert_eq!(HashValue::from_hex(hash.to_hex()).unwrap(), hash);
        assert_eq!(hash.to_hex().len(), 66);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(HashValue::from_hex("0xabcd").is_err());
    }

    #[test]
    fn test_json() {
        let hash = HashValue::new([0xab; HASH_LENGTH]);
        let json = serde_json::to_string(&hash).unwrap();
        let parsed: HashValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }
}
