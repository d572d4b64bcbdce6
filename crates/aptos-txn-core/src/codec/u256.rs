//! A 256-bit unsigned integer for Move `u256` values.

use crate::error::{AptosError, AptosResult, CodecError};
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Width of a u256 in bytes.
pub const U256_LENGTH: usize = 32;

/// A Move `u256`, stored little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u8; U256_LENGTH]);

impl U256 {
    /// Zero.
    pub const ZERO: Self = Self([0u8; U256_LENGTH]);
    /// 2^256 - 1.
    pub const MAX: Self = Self([0xff; U256_LENGTH]);

    /// Creates a value from little-endian bytes.
    pub const fn from_le_bytes(bytes: [u8; U256_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the little-endian bytes.
    pub const fn to_le_bytes(self) -> [u8; U256_LENGTH] {
        self.0
    }

    /// Returns the big-endian bytes.
    pub fn to_be_bytes(self) -> [u8; U256_LENGTH] {
        let mut out = self.0;
        out.reverse();
        out
    }

    /// Creates a value from a big-endian byte slice of any length.
    ///
    /// Slices longer than 32 bytes are accepted only if the excess leading
    /// bytes are zero.
    pub fn from_be_slice(bytes: &[u8]) -> AptosResult<Self> {
        let (excess, significant) = bytes.split_at(bytes.len().saturating_sub(U256_LENGTH));
        if excess.iter().any(|b| *b != 0) {
            return Err(CodecError::OutOfRange(format!(
                "{}-byte value does not fit in u256",
                bytes.len()
            ))
            .into());
        }
        let mut le = [0u8; U256_LENGTH];
        for (dst, src) in le.iter_mut().zip(significant.iter().rev()) {
            *dst = *src;
        }
        Ok(Self(le))
    }

    /// Creates a value from a u128.
    pub fn from_u128(value: u128) -> Self {
        let mut le = [0u8; U256_LENGTH];
        le[..16].copy_from_slice(&value.to_le_bytes());
        Self(le)
    }

    /// Returns the value as a u128 if it fits.
    pub fn to_u128(self) -> Option<u128> {
        if self.0[16..].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[..16]);
        Some(u128::from_le_bytes(low))
    }

    fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from_u128(u128::from(value))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl FromStr for U256 {
    type Err = AptosError;

    /// Parses a decimal string, or hex with a `0x` prefix.
    fn from_str(s: &str) -> AptosResult<Self> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x") {
            Some(hex_digits) => BigUint::parse_bytes(hex_digits.as_bytes(), 16),
            None => BigUint::parse_bytes(s.as_bytes(), 10),
        };
        let value = parsed
            .ok_or_else(|| CodecError::OutOfRange(format!("'{s}' is not a u256 literal")))?;
        if value.bits() > 256 {
            return Err(CodecError::OutOfRange(format!("{s} exceeds u256::MAX")).into());
        }
        Self::from_be_slice(&value.to_bytes_be())
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_be_bytes().cmp(&other.to_be_bytes())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}
