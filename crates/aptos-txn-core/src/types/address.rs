//! Account address type.
//!
//! Aptos account addresses are 32-byte values. Special addresses (the
//! framework range `0x0` to `0xf`) print in short form, everything else
//! prints as 64 hexadecimal characters with a `0x` prefix.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::crypto::{sha3_256_of, Scheme};
use crate::error::{AptosError, AptosResult};
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// `0x0`.
    pub const ZERO: Self = Self::from_u8(0);
    /// `0x1`, the framework address.
    pub const ONE: Self = Self::from_u8(1);
    /// `0x2`.
    pub const TWO: Self = Self::from_u8(2);
    /// `0x3`, the legacy token address.
    pub const THREE: Self = Self::from_u8(3);
    /// `0x4`, the digital asset address.
    pub const FOUR: Self = Self::from_u8(4);
    /// `0x5`.
    pub const FIVE: Self = Self::from_u8(5);
    /// `0x6`.
    pub const SIX: Self = Self::from_u8(6);
    /// `0x7`.
    pub const SEVEN: Self = Self::from_u8(7);
    /// `0x8`.
    pub const EIGHT: Self = Self::from_u8(8);
    /// `0x9`.
    pub const NINE: Self = Self::from_u8(9);
    /// `0xa`, the fungible asset metadata address of APT.
    pub const TEN: Self = Self::from_u8(10);

    /// Creates an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    /// Parses a hex address, long or short, with or without `0x`.
    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> AptosResult<Self> {
        let hex_str = hex_str.as_ref();
        let digits = hex_str
            .strip_prefix(b"0x")
            .or_else(|| hex_str.strip_prefix(b"0X"))
            .unwrap_or(hex_str);
        let digits = std::str::from_utf8(digits)
            .map_err(|e| AptosError::InvalidAddress(e.to_string()))?;

        if digits.is_empty() {
            return Err(AptosError::InvalidAddress(
                "address must contain at least one hex digit".to_string(),
            ));
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AptosError::InvalidAddress(format!(
                "address too long: {} characters (max {})",
                digits.len(),
                ADDRESS_LENGTH * 2
            )));
        }

        let padded = format!("{:0>64}", digits);
        let mut address = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut address)
            .map_err(|e| AptosError::InvalidAddress(format!("{digits}: {e}")))?;
        Ok(Self(address))
    }

    /// Parses a bech32 or bech32m address with any human readable part.
    pub fn from_bech32(s: &str) -> AptosResult<Self> {
        let (_hrp, data) =
            bech32::decode(s).map_err(|e| AptosError::InvalidAddress(e.to_string()))?;
        Self::from_bytes(data)
    }

    /// Encodes the address as bech32 under the given human readable part.
    pub fn to_bech32(&self, hrp: &str) -> AptosResult<String> {
        let hrp = Hrp::parse(hrp).map_err(|e| AptosError::InvalidAddress(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| AptosError::InvalidAddress(e.to_string()))
    }

    /// Creates an address from a 32-byte slice.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> AptosResult<Self> {
        let bytes = bytes.as_ref();
        let address: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(address))
    }

    /// Returns the address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address bytes by value.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Full 64-digit hex form.
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Hex form with leading zeros removed.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// Returns true for `0x0` through `0xf`.
    pub fn is_special(&self) -> bool {
        self.0[..ADDRESS_LENGTH - 1].iter().all(|&b| b == 0) && self.0[ADDRESS_LENGTH - 1] < 16
    }

    /// Returns true for `0x0`.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    fn derive(source: &AccountAddress, seed: &[u8], scheme: Scheme) -> Self {
        Self(sha3_256_of([source.as_bytes(), seed, &[scheme.as_byte()][..]]))
    }

    /// Address of a named object created by `creator` with `seed`.
    pub fn create_object_address(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive(creator, seed, Scheme::DeriveObjectAddressFromSeed)
    }

    /// Address of an object derived from another object address.
    pub fn create_user_derived_object_address(
        creator: &AccountAddress,
        derive_from: &AccountAddress,
    ) -> Self {
        Self::derive(
            creator,
            derive_from.as_bytes(),
            Scheme::DeriveObjectAddressFromObject,
        )
    }

    /// Address of a resource account created by `creator` with `seed`.
    pub fn create_resource_address(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive(creator, seed, Scheme::DeriveResourceAccountAddress)
    }
}

impl Default for AccountAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_special() {
            write!(f, "0x{:x}", self.0[ADDRESS_LENGTH - 1])
        } else {
            write!(f, "{}", self.to_long_string())
        }
    }
}

impl FromStr for AccountAddress {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let looks_hex = s.starts_with("0x")
            || s.starts_with("0X")
            || s.chars().all(|c| c.is_ascii_hexdigit());
        if looks_hex {
            Self::from_hex(s)
        } else {
            Self::from_bech32(s)
        }
    }
}

impl BcsCodec for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.fixed_bytes(&self.0);
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.fixed_array().map(Self)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            Serialize::serialize(&self.0, serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as Deserialize>::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; ADDRESS_LENGTH] as Deserialize>::deserialize(deserializer).map(Self)
        }
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let addr = AccountAddress::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(addr, AccountAddress::ONE);
        assert_eq!(AccountAddress::from_hex("0x1").unwrap(), AccountAddress::ONE);
        assert_eq!(AccountAddress::from_hex("0XA").unwrap(), AccountAddress::TEN);
        assert_eq!(AccountAddress::from_hex("1").unwrap(), AccountAddress::ONE);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(AccountAddress::from_hex("").is_err());
        assert!(AccountAddress::from_hex("0x").is_err());
        assert!(AccountAddress::from_hex("0xzz").is_err());
        assert!(AccountAddress::from_hex(format!("0x{}", "1".repeat(65))).is_err());
    }

    #[test]
    fn test_special_display() {
        let four = AccountAddress::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000004",
        )
        .unwrap();
        assert_eq!(four.to_string(), "0x4");
        assert_eq!(AccountAddress::ZERO.to_string(), "0x0");
        assert_eq!(AccountAddress::TEN.to_string(), "0xa");
    }

    #[test]
    fn test_non_special_display() {
        let sixteen = AccountAddress::from_hex("0x10").unwrap();
        assert!(!sixteen.is_special());
        assert_eq!(
            sixteen.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000010"
        );

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = 1;
        bytes[ADDRESS_LENGTH - 1] = 1;
        let high = AccountAddress::new(bytes);
        assert_eq!(high.to_string().len(), 66);
    }

    #[test]
    fn test_bech32_round_trip() {
        let addr = AccountAddress::from_hex("0xcafe").unwrap();
        let encoded = addr.to_bech32("aptos").unwrap();
        assert!(encoded.starts_with("aptos1"));
        assert_eq!(AccountAddress::from_bech32(&encoded).unwrap(), addr);
        assert_eq!(encoded.parse::<AccountAddress>().unwrap(), addr);
    }

    #[test]
    fn test_bech32_wrong_length() {
        let hrp = Hrp::parse("aptos").unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[1u8; 20]).unwrap();
        assert!(AccountAddress::from_bech32(&encoded).is_err());
    }

    #[test]
    fn test_bcs_is_fixed_width() {
        let bytes = AccountAddress::ONE.to_bcs().unwrap();
        assert_eq!(bytes.len(), ADDRESS_LENGTH);
        assert_eq!(AccountAddress::from_bcs(&bytes).unwrap(), AccountAddress::ONE);
    }

    #[test]
    fn test_json_uses_display() {
        let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
        assert_eq!(json, "\"0x1\"");
        let parsed: AccountAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AccountAddress::ONE);
    }

    #[test]
    fn test_binary_serde_uses_raw_bytes() {
        let address = AccountAddress::from_hex("0xcafe").unwrap();
        let bytes = bcs::to_bytes(&address).unwrap();
        assert_eq!(bytes, address.to_bcs().unwrap());
        assert_eq!(bytes.len(), ADDRESS_LENGTH);
        let parsed: AccountAddress = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_object_address_derivation() {
        let creator = AccountAddress::ONE;
        let named = AccountAddress::create_object_address(&creator, b"seed");
        let resource = AccountAddress::create_resource_address(&creator, b"seed");
        assert_ne!(named, resource);
        assert_eq!(
            named,
            AccountAddress::new(sha3_256_of([creator.as_bytes(), &b"seed"[..], &[0xfe][..]]))
        );
        let derived = AccountAddress::create_user_derived_object_address(&creator, &named);
        assert_eq!(
            derived,
            AccountAddress::new(sha3_256_of([creator.as_bytes(), named.as_bytes(), &[0xfc][..]]))
        );
    }
}
