//! Low-level protobuf wire format primitives.
//!
//! ## Wire Format Overview
//!
//! Each protobuf field is encoded as:
//! - A varint "tag" containing the field number and wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (int32, int64, uint32, uint64, sint32, sint64, bool, enum)
//! - 1: FIXED64 (fixed64, sfixed64, double)
//! - 2: LENGTH_DELIMITED (string, bytes, embedded messages, packed repeated fields)
//! - 5: FIXED32 (fixed32, sfixed32, float)
//!
//! Group wire types 3 and 4 are rejected.

use crate::error::{DecodeError, Result};
use bytes::BufMut;
use tracing::trace;

/// Smallest valid field number
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Maximum valid protobuf field number (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Field numbers reserved for the protobuf implementation itself
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Nesting depth allowed for embedded messages by default
pub const RECURSION_LIMIT: u32 = 100;

/// Longest possible varint encoding of a 64-bit value
const MAX_VARINT_LEN: usize = 10;

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length integer
    Varint = 0,
    /// 64-bit fixed-width, little-endian
    Fixed64 = 1,
    /// Varint length prefix followed by that many bytes
    LengthDelimited = 2,
    /// 32-bit fixed-width, little-endian
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = u8;

    /// Fails with the raw value for groups (3, 4) and undefined codes.
    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(other),
        }
    }
}

/// Returns true if `number` may be used as a field number in a schema.
pub fn is_valid_field_number(number: u32) -> bool {
    (MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&number)
        && !RESERVED_FIELD_NUMBERS.contains(&number)
}

/// Encode `value` as a little-endian base-128 varint.
#[inline]
pub fn encode_varint<B: BufMut>(mut value: u64, buf: &mut B) {
    loop {
        if value < 0x80 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }
}

/// Decode a varint from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed. The error
/// offset is relative to the start of `data`.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(DecodeError::malformed_varint(0));
        }
        // The tenth byte holds only bit 63
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(DecodeError::malformed_varint(0));
        }

        result |= ((byte & 0x7F) as u64) << (i * 7);

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(DecodeError::malformed_varint(0))
}

/// Number of bytes `value` occupies once varint encoded (1 to 10).
#[inline]
pub fn encoded_len_varint(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros();
    ((bits + 6) / 7) as usize
}

/// ZigZag-encode a 32-bit signed value.
#[inline]
pub fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode32`].
#[inline]
pub fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// ZigZag-encode a 64-bit signed value.
#[inline]
pub fn zigzag_encode64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode64`].
#[inline]
pub fn zigzag_decode64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Write the tag `(number << 3) | wire_type` as a varint.
#[inline]
pub fn encode_tag<B: BufMut>(number: u32, wire_type: WireType, buf: &mut B) {
    debug_assert!((MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&number));
    encode_varint(((number as u64) << 3) | wire_type as u64, buf);
}

/// Split a decoded tag varint into field number and wire type.
///
/// `offset` is where the tag started and is only used for error reporting.
pub fn decode_tag(key: u64, offset: usize) -> Result<(u32, WireType)> {
    let wire_type = WireType::try_from((key & 0x07) as u8)
        .map_err(|value| DecodeError::UnsupportedWireType { value, offset })?;

    let number = key >> 3;
    if number < MIN_FIELD_NUMBER as u64 || number > MAX_FIELD_NUMBER as u64 {
        return Err(DecodeError::InvalidFieldNumber { number, offset });
    }

    Ok((number as u32, wire_type))
}

/// Encoded width of a tag for the given field number (1 to 5 bytes).
#[inline]
pub fn tag_len(number: u32) -> usize {
    encoded_len_varint((number as u64) << 3)
}

/// Fails with `WireTypeMismatch` unless `actual` is `expected`.
#[inline]
pub fn check_wire_type(expected: WireType, actual: WireType) -> Result<()> {
    if expected != actual {
        return Err(DecodeError::wire_type_mismatch(expected, actual));
    }
    Ok(())
}

/// Nesting budget threaded through message decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    depth_remaining: u32,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            depth_remaining: RECURSION_LIMIT,
        }
    }
}

impl DecodeContext {
    /// Creates a context allowing `limit` levels of embedded messages
    pub fn with_recursion_limit(limit: u32) -> Self {
        Self {
            depth_remaining: limit,
        }
    }

    /// Returns true once no further nesting is allowed
    pub fn limit_reached(&self) -> bool {
        self.depth_remaining == 0
    }

    /// Context for decoding one level deeper
    pub fn enter_recursion(&self) -> Self {
        Self {
            depth_remaining: self.depth_remaining.saturating_sub(1),
        }
    }
}

/// Read cursor over an immutable byte slice.
///
/// Offsets reported in errors are absolute with respect to the outermost
/// input, including for readers split off for embedded payloads.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Returns true when every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Absolute offset of the cursor
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Reads one varint
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.offset();
        let (value, len) = decode_varint(&self.data[self.pos..])
            .map_err(|_| DecodeError::malformed_varint(start))?;
        self.pos += len;
        Ok(value)
    }

    /// Reads a tag and splits it into field number and wire type
    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        let offset = self.offset();
        let key = self.read_varint()?;
        decode_tag(key, offset)
    }

    /// Reads exactly `len` raw bytes
    pub fn read_bytes(&mut self, len: u64) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining as u64 {
            return Err(DecodeError::truncated(self.offset(), len, remaining));
        }
        let out = &self.data[self.pos..self.pos + len as usize];
        self.pos += len as usize;
        Ok(out)
    }

    /// Reads a little-endian `u32`
    pub fn read_fixed32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(raw))
    }

    /// Reads a little-endian `u64`
    pub fn read_fixed64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads a varint length prefix and returns the payload it covers
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        self.read_bytes(len)
    }

    /// Reads a varint length prefix and returns a reader over the payload
    pub fn length_delimited(&mut self) -> Result<WireReader<'a>> {
        let len = self.read_varint()?;
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(WireReader { data, pos: 0, base })
    }
}

/// Consume and discard the payload of a field whose number is not known.
pub fn skip_field(number: u32, wire_type: WireType, reader: &mut WireReader<'_>) -> Result<()> {
    trace!(number, ?wire_type, offset = reader.offset(), "skipping unknown field");

    match wire_type {
        WireType::Varint => {
            reader.read_varint()?;
        }
        WireType::Fixed64 => {
            reader.read_bytes(8)?;
        }
        WireType::Fixed32 => {
            reader.read_bytes(4)?;
        }
        WireType::LengthDelimited => {
            reader.read_length_delimited()?;
        }
    }

    Ok(())
}
