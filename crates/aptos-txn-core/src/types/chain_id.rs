use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Identifies the network a transaction is valid on.
///
/// Encodes on the wire as a single byte. Equality and hashing compare that
/// byte, so `Other(1)` equals `Mainnet`; [`ChainId::from_u8`] always
/// yields the named variant.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChainId {
    /// Chain id 1.
    Mainnet,
    /// Chain id 2.
    Testnet,
    /// Chain id 4.
    Localnet,
    /// Any other network, including devnets.
    Other(u8),
}

impl ChainId {
    #[allow(missing_docs)]
    pub const MAINNET_ID: u8 = 1;
    #[allow(missing_docs)]
    pub const TESTNET_ID: u8 = 2;
    #[allow(missing_docs)]
    pub const LOCALNET_ID: u8 = 4;

    const MAINNET_NAME: &'static str = "mainnet";
    const TESTNET_NAME: &'static str = "testnet";
    const LOCALNET_NAME: &'static str = "localnet";

    /// Maps a raw chain id to a known network where possible.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            Self::MAINNET_ID => Self::Mainnet,
            Self::TESTNET_ID => Self::Testnet,
            Self::LOCALNET_ID => Self::Localnet,
            other => Self::Other(other),
        }
    }

    /// Returns the raw chain id.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Mainnet => Self::MAINNET_ID,
            Self::Testnet => Self::TESTNET_ID,
            Self::Localnet => Self::LOCALNET_ID,
            Self::Other(other) => other,
        }
    }

    fn as_known_name(self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some(Self::MAINNET_NAME),
            Self::Testnet => Some(Self::TESTNET_NAME),
            Self::Localnet => Some(Self::LOCALNET_NAME),
            Self::Other(_) => None,
        }
    }
}

impl PartialEq for ChainId {
    fn eq(&self, other: &Self) -> bool {
        self.as_u8() == other.as_u8()
    }
}

impl Eq for ChainId {}

impl Hash for ChainId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_u8().hash(state);
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::Testnet
    }
}

impl From<u8> for ChainId {
    fn from(raw: u8) -> Self {
        Self::from_u8(raw)
    }
}

impl From<ChainId> for u8 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.as_u8()
    }
}

impl Debug for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_known_name() {
            Some(name) => write!(f, "ChainId({name}={})", self.as_u8()),
            None => write!(f, "ChainId({})", self.as_u8()),
        }
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_known_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.as_u8()),
        }
    }
}

impl FromStr for ChainId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            Self::MAINNET_NAME => Ok(Self::Mainnet),
            Self::TESTNET_NAME => Ok(Self::Testnet),
            Self::LOCALNET_NAME => Ok(Self::Localnet),
            other => other
                .parse::<u8>()
                .map(Self::from_u8)
                .map_err(|_| AptosError::Config(format!("unknown chain id '{s}'"))),
        }
    }
}

impl BcsCodec for ChainId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.u8(self.as_u8());
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.u8().map(Self::from_u8)
    }
}
