//! Error types for the transaction core.
//!
//! Every fallible operation returns [`AptosResult`]. Codec failures carry a
//! structured [`CodecError`] so callers can tell a truncated buffer apart
//! from an unknown enum discriminant.

use thiserror::Error;

/// A specialized Result type for transaction core operations.
pub type AptosResult<T> = Result<T, AptosError>;

/// The main error type for the transaction core.
#[derive(Error, Debug)]
pub enum AptosError {
    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Codec(#[from] CodecError),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Error occurred during JSON deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid type tag format
    #[error("Invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// Invalid Move identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An entry function argument does not match its declared type
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transaction building error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Authenticators could not be combined into a transaction authenticator
    #[error("Composition error: {0}")]
    Composition(String),

    /// Insufficient signatures for multi-signature operation
    #[error("Insufficient signatures: need {required}, got {provided}")]
    InsufficientSignatures {
        /// Number of signatures required
        required: usize,
        /// Number of signatures provided
        provided: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AptosError {
    /// Creates a transaction building error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a composition error.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns true if this error came from the byte-level codec.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Self::Codec(_))
    }
}

/// Errors raised while reading or writing BCS bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before a value was complete
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the read
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// A boolean byte other than 0 or 1
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// A ULEB128 value does not fit in 32 bits
    #[error("ULEB128 value overflows u32")]
    Uleb128Overflow,

    /// A ULEB128 value has a redundant trailing zero group
    #[error("non-canonical ULEB128 encoding")]
    NonCanonicalUleb128,

    /// A sequence is too long to be length-prefixed
    #[error("sequence length {0} exceeds u32::MAX")]
    LengthOverflow(usize),

    /// An enum discriminant that this type does not define
    #[error("unknown {type_name} variant {index}")]
    UnknownVariant {
        /// Name of the enum being decoded
        type_name: &'static str,
        /// The discriminant read from the input
        index: u32,
    },

    /// A defined but unsupported enum discriminant
    #[error("unsupported {type_name} variant {index}")]
    Unsupported {
        /// Name of the enum being decoded
        type_name: &'static str,
        /// The discriminant read from the input
        index: u32,
    },

    /// Bytes left over after a complete value was decoded
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A string payload that is not valid UTF-8
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    /// A numeric value outside the width of its type
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

impl CodecError {
    /// Creates an unknown variant error.
    pub fn unknown_variant(type_name: &'static str, index: u32) -> Self {
        Self::UnknownVariant { type_name, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_converts() {
        let err: AptosError = CodecError::InvalidBool(2).into();
        assert!(err.is_codec_error());
        assert_eq!(err.to_string(), "BCS error: invalid bool byte 0x02");
    }

    #[test]
    fn test_unknown_variant_display() {
        let err = CodecError::unknown_variant("TransactionPayload", 7);
        assert_eq!(err.to_string(), "unknown TransactionPayload variant 7");
    }

    #[test]
    fn test_insufficient_signatures_display() {
        let err = AptosError::InsufficientSignatures {
            required: 2,
            provided: 1,
        };
        assert_eq!(err.to_string(), "Insufficient signatures: need 2, got 1");
    }
}
