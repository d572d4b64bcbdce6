//! Participation bitmap for multi-key signatures.

use crate::codec::{BcsCodec, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};

/// Maximum number of keys a bitmap can address.
pub const MAX_BITMAP_INDICES: u8 = 32;

const MAX_BITMAP_BYTES: usize = MAX_BITMAP_INDICES as usize / 8;

/// Marks which keys of a multi-key contributed a signature.
///
/// * Index 0 is the most significant bit of the first byte.
/// * Only the bytes needed to cover the highest set index are encoded, so
///   `{0}` encodes as one byte and `{0, 9}` as two.
/// * An index can be set once; indices of 32 or more are rejected.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MultiKeyBitmap {
    bits: [u8; MAX_BITMAP_BYTES],
    len: u8,
}

impl MultiKeyBitmap {
    /// Creates an empty bitmap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bitmap from indices, rejecting duplicates.
    pub fn from_indices(indices: &[u8]) -> AptosResult<Self> {
        let mut bitmap = Self::new();
        for index in indices {
            bitmap.add(*index)?;
        }
        Ok(bitmap)
    }

    /// Parses the encoded bytes, without the length prefix.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() > MAX_BITMAP_BYTES {
            return Err(AptosError::InvalidSignature(format!(
                "bitmap of {} bytes exceeds {} bytes",
                bytes.len(),
                MAX_BITMAP_BYTES
            )));
        }
        let mut bits = [0u8; MAX_BITMAP_BYTES];
        bits[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bits,
            len: bytes.len() as u8,
        })
    }

    /// Sets `index`.
    pub fn add(&mut self, index: u8) -> AptosResult<()> {
        if index >= MAX_BITMAP_INDICES {
            return Err(AptosError::InvalidSignature(format!(
                "bitmap index {} out of range, must be less than {}",
                index, MAX_BITMAP_INDICES
            )));
        }
        if self.contains(index) {
            return Err(AptosError::InvalidSignature(format!(
                "bitmap index {index} is already set"
            )));
        }
        let byte = (index / 8) as usize;
        self.len = self.len.max(byte as u8 + 1);
        self.bits[byte] |= 0b1000_0000 >> (index % 8);
        Ok(())
    }

    /// Returns true if `index` is set.
    pub fn contains(&self, index: u8) -> bool {
        let byte = (index / 8) as usize;
        byte < self.len as usize && self.bits[byte] & (0b1000_0000 >> (index % 8)) != 0
    }

    /// Set indices in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..self.len * 8).filter(|i| self.contains(*i)).collect()
    }

    /// Number of set indices.
    pub fn count(&self) -> usize {
        self.as_bytes().iter().map(|b| b.count_ones() as usize).sum()
    }

    /// The encoded bytes, without the length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits[..self.len as usize]
    }
}

impl BcsCodec for MultiKeyBitmap {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.write_bytes(self.as_bytes())
    }

    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::from_bytes(&deserializer.read_bytes()?)
    }
}

impl std::fmt::Debug for MultiKeyBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MultiKeyBitmap({:?})", self.indices())
    }
}
