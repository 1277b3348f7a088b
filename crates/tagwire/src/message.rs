//! The contract implemented by every generated message type.

use crate::error::{EncodeError, Result};
use crate::wire::{encode_varint, encoded_len_varint, DecodeContext, WireReader, WireType};
use bytes::BufMut;

/// A protobuf message with a statically known schema.
///
/// Implementations provide the three schema-specific pieces
/// ([`encode_raw`](Message::encode_raw), [`merge_field`](Message::merge_field)
/// and [`encoded_len`](Message::encoded_len)); everything else is derived.
pub trait Message: Default + std::fmt::Debug + Send + Sync {
    /// Writes every present field, in ascending field-number order, without
    /// a length prefix.
    fn encode_raw<B: BufMut>(&self, buf: &mut B);

    /// Decodes one field occurrence whose tag has already been read.
    ///
    /// Unknown field numbers must be skipped with
    /// [`skip_field`](crate::wire::skip_field).
    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> Result<()>;

    /// Exact number of bytes [`encode_raw`](Message::encode_raw) writes.
    fn encoded_len(&self) -> usize;

    /// Encodes into `buf`, failing if it cannot hold the whole message.
    fn encode<B: BufMut>(&self, buf: &mut B) -> std::result::Result<(), EncodeError> {
        let required = self.encoded_len();
        let remaining = buf.remaining_mut();
        if required > remaining {
            return Err(EncodeError::new(required, remaining));
        }
        self.encode_raw(buf);
        Ok(())
    }

    /// Encodes into a freshly allocated buffer.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        buf
    }

    /// Encodes with a leading varint length prefix.
    fn encode_length_delimited_to_vec(&self) -> Vec<u8> {
        let len = self.encoded_len();
        let mut buf = Vec::with_capacity(encoded_len_varint(len as u64) + len);
        encode_varint(len as u64, &mut buf);
        self.encode_raw(&mut buf);
        buf
    }

    /// Decodes a complete message from `data`.
    ///
    /// On failure nothing partially decoded is returned.
    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        msg.merge(data)?;
        Ok(msg)
    }

    /// Decodes a message preceded by a varint length prefix.
    fn decode_length_delimited(data: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(data);
        let mut inner = reader.length_delimited()?;
        let mut msg = Self::default();
        msg.merge_from_reader(&mut inner, DecodeContext::default())?;
        Ok(msg)
    }

    /// Decodes `data` on top of the current field values.
    fn merge(&mut self, data: &[u8]) -> Result<()> {
        self.merge_from_reader(&mut WireReader::new(data), DecodeContext::default())
    }

    /// Reads tags until `reader` is exhausted, dispatching each to
    /// [`merge_field`](Message::merge_field).
    fn merge_from_reader(&mut self, reader: &mut WireReader<'_>, ctx: DecodeContext) -> Result<()> {
        while !reader.is_empty() {
            let (number, wire_type) = reader.read_tag()?;
            self.merge_field(number, wire_type, reader, ctx)?;
        }
        Ok(())
    }

    /// Resets every field to its default.
    fn clear(&mut self) {
        *self = Self::default();
    }
}
