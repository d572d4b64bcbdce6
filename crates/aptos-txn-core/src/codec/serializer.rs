//! The write half of the BCS codec.

use crate::codec::{BcsCodec, U256, MAX_SEQUENCE_LENGTH};
use crate::error::{AptosResult, CodecError};

/// Accumulates BCS bytes.
///
/// Fixed-width writes cannot fail. Length-prefixed writes return an error
/// when the payload is longer than a BCS sequence may be, so a whole
/// structure can be written with `?` and checked once by the caller.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    output: Vec<u8>,
}

impl Serializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty serializer with preallocated space.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
        }
    }

    /// Writes a single byte.
    pub fn u8(&mut self, value: u8) {
        self.output.push(value);
    }

    /// Writes a little-endian u16.
    pub fn u16(&mut self, value: u16) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u32.
    pub fn u32(&mut self, value: u32) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u64.
    pub fn u64(&mut self, value: u64) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u128 (16 bytes).
    pub fn u128(&mut self, value: u128) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u256 (32 bytes).
    pub fn u256(&mut self, value: &U256) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a bool as `0x00` or `0x01`.
    pub fn bool(&mut self, value: bool) {
        self.output.push(u8::from(value));
    }

    /// Writes a ULEB128 encoded u32.
    pub fn uleb128(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.output.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }
        self.output.push(value as u8);
    }

    /// Writes an enum discriminant.
    pub fn variant(&mut self, index: u32) {
        self.uleb128(index);
    }

    /// Writes raw bytes with no length prefix.
    pub fn fixed_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Writes a sequence length prefix.
    pub fn length(&mut self, len: usize) -> AptosResult<()> {
        if len > MAX_SEQUENCE_LENGTH {
            return Err(CodecError::LengthOverflow(len).into());
        }
        self.uleb128(len as u32);
        Ok(())
    }

    /// Writes a length-prefixed byte vector.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> AptosResult<()> {
        self.length(bytes.len())?;
        self.fixed_bytes(bytes);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> AptosResult<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes any codec-aware value.
    pub fn value<T: BcsCodec>(&mut self, value: &T) -> AptosResult<()> {
        value.serialize(self)
    }

    /// Writes a length-prefixed sequence of codec-aware values.
    pub fn sequence<T: BcsCodec>(&mut self, items: &[T]) -> AptosResult<()> {
        self.length(items.len())?;
        for item in items {
            item.serialize(self)?;
        }
        Ok(())
    }

    /// Writes an optional value as a `0x00` / `0x01 ‖ value` tag.
    pub fn option<T: BcsCodec>(&mut self, value: Option<&T>) -> AptosResult<()> {
        match value {
            Some(inner) => {
                self.bool(true);
                inner.serialize(self)
            }
            None => {
                self.bool(false);
                Ok(())
            }
        }
    }

    /// Returns the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Clears the buffer for reuse.
    pub fn reset(&mut self) {
        self.output.clear();
    }

    /// Consumes the serializer and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}
