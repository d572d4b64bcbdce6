//! Binary Canonical Serialization.
//!
//! BCS is the little-endian, length-prefixed format used for all on-chain
//! data. Integers are fixed width, sequence lengths and enum discriminants
//! are ULEB128, and there is no schema on the wire: a reader must already
//! know the type it is decoding.
//!
//! Types opt in by implementing [`BcsCodec`].

mod deserializer;
mod serializer;
mod u256;

pub use deserializer::Deserializer;
pub use serializer::Serializer;
pub use u256::{U256, U256_LENGTH};

use crate::error::AptosResult;

/// Longest sequence BCS allows (2^31 - 1 elements).
pub const MAX_SEQUENCE_LENGTH: usize = (1 << 31) - 1;

/// A value with a canonical BCS encoding.
pub trait BcsCodec: Sized {
    /// Appends the encoding of `self`.
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()>;

    /// Reads one value from the cursor.
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self>;

    /// Encodes `self` into a fresh buffer.
    fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        let mut serializer = Serializer::new();
        self.serialize(&mut serializer)?;
        Ok(serializer.into_bytes())
    }

    /// Decodes a value that must span all of `bytes`.
    fn from_bcs(bytes: &[u8]) -> AptosResult<Self> {
        let mut deserializer = Deserializer::new(bytes);
        let value = Self::deserialize(&mut deserializer)?;
        deserializer.finish()?;
        Ok(value)
    }
}

macro_rules! impl_bcs_integer {
    ($($ty:ident),*) => {
        $(
            impl BcsCodec for $ty {
                fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
                    serializer.$ty(*self);
                    Ok(())
                }

                fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
                    deserializer.$ty()
                }
            }
        )*
    };
}

impl_bcs_integer!(u8, u16, u32, u64, u128, bool);

impl BcsCodec for U256 {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.u256(self);
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.u256()
    }
}

impl BcsCodec for String {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_string(self)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.read_string()
    }
}

impl<T: BcsCodec> BcsCodec for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.sequence(self)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.sequence()
    }
}

impl<T: BcsCodec> BcsCodec for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.option(self.as_ref())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.option()
    }
}

impl<T: BcsCodec> BcsCodec for Box<T> {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.as_ref().serialize(serializer)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        T::deserialize(deserializer).map(Box::new)
    }
}

impl<const N: usize> BcsCodec for [u8; N] {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.fixed_bytes(self);
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        deserializer.fixed_array()
    }
}

impl<A: BcsCodec, B: BcsCodec> BcsCodec for (A, B) {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.0.serialize(serializer)?;
        self.1.serialize(serializer)
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok((A::deserialize(deserializer)?, B::deserialize(deserializer)?))
    }
}

/// Encodes a value into BCS bytes.
pub fn to_bytes<T: BcsCodec>(value: &T) -> AptosResult<Vec<u8>> {
    value.to_bcs()
}

/// Decodes BCS bytes, rejecting trailing data.
pub fn from_bytes<T: BcsCodec>(bytes: &[u8]) -> AptosResult<T> {
    T::from_bcs(bytes)
}
