//! The read half of the BCS codec.

use crate::codec::{BcsCodec, U256, MAX_SEQUENCE_LENGTH};
use crate::error::{AptosResult, CodecError};

/// A cursor over BCS bytes.
///
/// Every read either returns a complete value or an error; the cursor never
/// hands back partially decoded data.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Deserializer<'a> {
    /// Creates a cursor at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// Returns true if every byte has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Errors if unread bytes are left over.
    pub fn finish(&self) -> AptosResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n).into()),
        }
    }

    /// Reads `len` bytes without a length prefix.
    pub fn fixed_bytes(&mut self, len: usize) -> AptosResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::UnexpectedEof {
                needed: len,
                remaining,
            }
            .into());
        }
        let start = self.position;
        self.position += len;
        Ok(&self.input[start..self.position])
    }

    /// Reads exactly `N` bytes into an array.
    pub fn fixed_array<const N: usize>(&mut self) -> AptosResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.fixed_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    pub fn u8(&mut self) -> AptosResult<u8> {
        Ok(self.fixed_bytes(1)?[0])
    }

    /// Reads a little-endian u16.
    pub fn u16(&mut self) -> AptosResult<u16> {
        Ok(u16::from_le_bytes(self.fixed_array()?))
    }

    /// Reads a little-endian u32.
    pub fn u32(&mut self) -> AptosResult<u32> {
        Ok(u32::from_le_bytes(self.fixed_array()?))
    }

    /// Reads a little-endian u64.
    pub fn u64(&mut self) -> AptosResult<u64> {
        Ok(u64::from_le_bytes(self.fixed_array()?))
    }

    /// Reads a little-endian u128.
    pub fn u128(&mut self) -> AptosResult<u128> {
        Ok(u128::from_le_bytes(self.fixed_array()?))
    }

    /// Reads a little-endian u256.
    pub fn u256(&mut self) -> AptosResult<U256> {
        Ok(U256::from_le_bytes(self.fixed_array()?))
    }

    /// Reads a bool; only `0x00` and `0x01` are accepted.
    pub fn bool(&mut self) -> AptosResult<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other).into()),
        }
    }

    /// Reads a canonical ULEB128 encoded u32.
    pub fn uleb128(&mut self) -> AptosResult<u32> {
        let mut value: u64 = 0;
        for shift in (0..32).step_by(7) {
            let byte = self.u8()?;
            let digit = byte & 0x7f;
            value |= u64::from(digit) << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(CodecError::NonCanonicalUleb128.into());
                }
                return u32::try_from(value).map_err(|_| CodecError::Uleb128Overflow.into());
            }
        }
        Err(CodecError::Uleb128Overflow.into())
    }

    /// Reads an enum discriminant.
    pub fn variant(&mut self) -> AptosResult<u32> {
        self.uleb128()
    }

    /// Reads a sequence length prefix.
    pub fn length(&mut self) -> AptosResult<usize> {
        let len = self.uleb128()? as usize;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(CodecError::LengthOverflow(len).into());
        }
        Ok(len)
    }

    /// Reads a length-prefixed byte vector.
    pub fn read_bytes(&mut self) -> AptosResult<Vec<u8>> {
        let len = self.length()?;
        Ok(self.fixed_bytes(len)?.to_vec())
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> AptosResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8.into())
    }

    /// Reads any codec-aware value.
    pub fn value<T: BcsCodec>(&mut self) -> AptosResult<T> {
        T::deserialize(self)
    }

    /// Reads a length-prefixed sequence of codec-aware values.
    pub fn sequence<T: BcsCodec>(&mut self) -> AptosResult<Vec<T>> {
        let len = self.length()?;
        // Every element takes at least one byte.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::deserialize(self)?);
        }
        Ok(items)
    }

    /// Reads an optional value.
    pub fn option<T: BcsCodec>(&mut self) -> AptosResult<Option<T>> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::deserialize(self)?)),
            other => Err(CodecError::unknown_variant("Option", u32::from(other)).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AptosError;

    fn codec_err<T: std::fmt::Debug>(result: AptosResult<T>) -> CodecError {
        match result {
            Err(AptosError::Codec(err)) => err,
            other => panic!("expected codec error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_past_end() {
        let mut de = Deserializer::new(&[1, 2, 3]);
        assert_eq!(
            codec_err(de.u32()),
            CodecError::UnexpectedEof {
                needed: 4,
                remaining: 3
            }
        );
        // The failed read consumed nothing.
        assert_eq!(de.remaining(), 3);
    }

    #[test]
    fn test_invalid_bool() {
        let mut de = Deserializer::new(&[2]);
        assert_eq!(codec_err(de.bool()), CodecError::InvalidBool(2));
    }

    #[test]
    fn test_uleb128_decoding() {
        let mut de = Deserializer::new(&[0x80, 0x80, 0x01, 0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(de.uleb128().unwrap(), 16_384);
        assert_eq!(de.uleb128().unwrap(), u32::MAX);
        de.finish().unwrap();
    }

    #[test]
    fn test_uleb128_overflow() {
        let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x10]);
        assert_eq!(codec_err(de.uleb128()), CodecError::Uleb128Overflow);

        let mut de = Deserializer::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(codec_err(de.uleb128()), CodecError::Uleb128Overflow);
    }

    #[test]
    fn test_uleb128_non_canonical() {
        let mut de = Deserializer::new(&[0x81, 0x00]);
        assert_eq!(codec_err(de.uleb128()), CodecError::NonCanonicalUleb128);
    }

    #[test]
    fn test_read_string() {
        let mut de = Deserializer::new(&[3, b'a', b'b', b'c', 0xaa]);
        assert_eq!(de.read_string().unwrap(), "abc");
        assert_eq!(de.remaining(), 1);
        assert_eq!(codec_err(de.finish()), CodecError::TrailingBytes(1));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut de = Deserializer::new(&[2, 0xc3, 0x28]);
        assert_eq!(codec_err(de.read_string()), CodecError::InvalidUtf8);
    }

    #[test]
    fn test_sequence_truncated() {
        // Claims three u16 elements but carries two.
        let mut de = Deserializer::new(&[3, 1, 0, 2, 0]);
        assert!(matches!(
            codec_err(de.sequence::<u16>()),
            CodecError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_option_bad_tag() {
        let mut de = Deserializer::new(&[2, 0]);
        assert_eq!(
            codec_err(de.option::<u8>()),
            CodecError::unknown_variant("Option", 2)
        );
    }
}
