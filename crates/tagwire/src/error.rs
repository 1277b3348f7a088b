//! Error types for the tagwire runtime.
//!
//! Every decode failure is terminal for the message being decoded. Callers
//! receive the error instead of a partially populated message.

use crate::wire::WireType;
use thiserror::Error;

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Failure while decoding protobuf wire format data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A varint ran past 10 bytes or the input ended mid-sequence
    #[error("malformed varint at offset {offset}")]
    MalformedVarint {
        /// Byte offset where the varint started
        offset: usize,
    },

    /// Tag carried a group (3, 4) or otherwise undefined wire type
    #[error("unsupported wire type {value} at offset {offset}")]
    UnsupportedWireType {
        /// The raw 3-bit wire type value
        value: u8,
        /// Byte offset of the tag
        offset: usize,
    },

    /// A known field arrived with a wire type its declared type cannot use
    #[error("wire type mismatch: got {actual:?}, expected {expected:?}")]
    WireTypeMismatch {
        /// Wire type implied by the declared field type
        expected: WireType,
        /// Wire type found in the tag
        actual: WireType,
    },

    /// Tag decoded to field number 0 or beyond the 29-bit range
    #[error("invalid field number {number} at offset {offset}")]
    InvalidFieldNumber {
        /// The decoded field number
        number: u64,
        /// Byte offset of the tag
        offset: usize,
    },

    /// Fixed-width or length-delimited payload extends past the input
    #[error("truncated payload at offset {offset}: need {needed} bytes, have {remaining}")]
    Truncated {
        /// Byte offset where the payload starts
        offset: usize,
        /// Bytes the payload claims
        needed: u64,
        /// Bytes actually left in the input
        remaining: usize,
    },

    /// A `string` field held bytes that are not UTF-8
    #[error("invalid UTF-8 in string field at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the string payload
        offset: usize,
    },

    /// Embedded messages nested deeper than the decode context allows
    #[error("recursion limit reached at offset {offset}")]
    RecursionLimitExceeded {
        /// Byte offset of the embedded message that crossed the limit
        offset: usize,
    },
}

impl DecodeError {
    /// Creates a new malformed varint error
    pub fn malformed_varint(offset: usize) -> Self {
        Self::MalformedVarint { offset }
    }

    /// Creates a new wire type mismatch error
    pub fn wire_type_mismatch(expected: WireType, actual: WireType) -> Self {
        Self::WireTypeMismatch { expected, actual }
    }

    /// Creates a new truncation error
    pub fn truncated(offset: usize, needed: u64, remaining: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            remaining,
        }
    }

    /// Returns the byte offset the error refers to, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::MalformedVarint { offset }
            | Self::UnsupportedWireType { offset, .. }
            | Self::InvalidFieldNumber { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::RecursionLimitExceeded { offset } => Some(*offset),
            Self::WireTypeMismatch { .. } => None,
        }
    }
}

/// The destination buffer cannot hold the encoded message
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("buffer too small: need {required} bytes, {remaining} remaining")]
pub struct EncodeError {
    required: usize,
    remaining: usize,
}

impl EncodeError {
    /// Creates a new encode error
    pub fn new(required: usize, remaining: usize) -> Self {
        Self {
            required,
            remaining,
        }
    }

    /// Bytes the message needs
    pub fn required_capacity(&self) -> usize {
        self.required
    }

    /// Bytes the buffer had left
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::malformed_varint(7);
        assert_eq!(err.to_string(), "malformed varint at offset 7");

        let err = DecodeError::wire_type_mismatch(WireType::Varint, WireType::LengthDelimited);
        assert!(err.to_string().contains("LengthDelimited"));
    }

    #[test]
    fn test_offset() {
        assert_eq!(DecodeError::truncated(3, 10, 2).offset(), Some(3));
        assert_eq!(
            DecodeError::wire_type_mismatch(WireType::Fixed32, WireType::Fixed64).offset(),
            None
        );
    }
}
