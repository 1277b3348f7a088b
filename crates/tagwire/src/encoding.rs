//! Per-field-kind encode and decode routines.
//!
//! Generated `Message` implementations call into these modules; each proto
//! field kind has a submodule exposing the same set of functions, so the code
//! generator can select a module by kind and emit an identical call shape.
//!
//! Every `merge*` function takes the wire type found in the tag and fails with
//! `WireTypeMismatch` when the declared kind cannot use it. Repeated numeric
//! kinds accept both packed and unpacked occurrences.

use crate::error::{DecodeError, Result};
use crate::message::Message;
use crate::wire::{
    check_wire_type, encode_tag, encode_varint, encoded_len_varint, skip_field, tag_len,
    zigzag_decode32, zigzag_decode64, zigzag_encode32, zigzag_encode64, DecodeContext,
    WireReader, WireType,
};
use ::bytes::BufMut;

/// Emits the repeated and packed helpers shared by every numeric kind.
///
/// The invoking module must define `WIRE_TYPE`, `write_raw`, `read_raw` and
/// `raw_len` for its element type.
macro_rules! numeric_repeated {
    ($ty:ty) => {
        /// Writes one tag and value per element.
        pub fn encode_repeated<B: BufMut>(number: u32, values: &[$ty], buf: &mut B) {
            for value in values {
                encode(number, value, buf);
            }
        }

        /// Writes a single tag and one length-delimited block holding every
        /// element's raw encoding. Nothing is written for an empty slice.
        pub fn encode_packed<B: BufMut>(number: u32, values: &[$ty], buf: &mut B) {
            if values.is_empty() {
                return;
            }
            encode_tag(number, WireType::LengthDelimited, buf);
            let len: usize = values.iter().map(raw_len).sum();
            encode_varint(len as u64, buf);
            for value in values {
                write_raw(value, buf);
            }
        }

        /// Appends either one element or a whole packed block.
        pub fn merge_repeated(
            wire_type: WireType,
            values: &mut Vec<$ty>,
            reader: &mut WireReader<'_>,
            _ctx: DecodeContext,
        ) -> Result<()> {
            if wire_type == WireType::LengthDelimited {
                let mut packed = reader.length_delimited()?;
                while !packed.is_empty() {
                    values.push(read_raw(&mut packed)?);
                }
            } else {
                check_wire_type(WIRE_TYPE, wire_type)?;
                values.push(read_raw(reader)?);
            }
            Ok(())
        }

        pub fn encoded_len(number: u32, value: &$ty) -> usize {
            tag_len(number) + raw_len(value)
        }

        pub fn encoded_len_repeated(number: u32, values: &[$ty]) -> usize {
            tag_len(number) * values.len() + values.iter().map(raw_len).sum::<usize>()
        }

        pub fn encoded_len_packed(number: u32, values: &[$ty]) -> usize {
            if values.is_empty() {
                return 0;
            }
            let len: usize = values.iter().map(raw_len).sum();
            tag_len(number) + encoded_len_varint(len as u64) + len
        }
    };
}

/// Emits a module for a kind carried as a varint.
macro_rules! varint {
    ($ty:ty, $proto_ty:ident) => {
        varint!($ty, $proto_ty,
                to_u64(value) *value as u64,
                from_u64(value) value as $ty);
    };

    ($ty:ty,
     $proto_ty:ident,
     to_u64($to:ident) $to_u64:expr,
     from_u64($from:ident) $from_u64:expr) => {
        #[doc = concat!("`", stringify!($proto_ty), "` fields, wire type VARINT.")]
        pub mod $proto_ty {
            use super::*;

            const WIRE_TYPE: WireType = WireType::Varint;

            #[inline]
            fn to_u64($to: &$ty) -> u64 {
                $to_u64
            }

            #[inline]
            fn write_raw<B: BufMut>(value: &$ty, buf: &mut B) {
                encode_varint(to_u64(value), buf);
            }

            #[inline]
            fn read_raw(reader: &mut WireReader<'_>) -> Result<$ty> {
                let $from = reader.read_varint()?;
                Ok($from_u64)
            }

            #[inline]
            fn raw_len(value: &$ty) -> usize {
                encoded_len_varint(to_u64(value))
            }

            pub fn encode<B: BufMut>(number: u32, value: &$ty, buf: &mut B) {
                encode_tag(number, WIRE_TYPE, buf);
                write_raw(value, buf);
            }

            pub fn merge(
                wire_type: WireType,
                value: &mut $ty,
                reader: &mut WireReader<'_>,
                _ctx: DecodeContext,
            ) -> Result<()> {
                check_wire_type(WIRE_TYPE, wire_type)?;
                *value = read_raw(reader)?;
                Ok(())
            }

            numeric_repeated!($ty);
        }
    };
}

varint!(i32, int32);
varint!(i64, int64);
varint!(u32, uint32);
varint!(u64, uint64);
varint!(bool, bool,
        to_u64(value) u64::from(*value),
        from_u64(value) value != 0);
varint!(i32, sint32,
        to_u64(value) zigzag_encode32(*value) as u64,
        from_u64(value) zigzag_decode32(value as u32));
varint!(i64, sint64,
        to_u64(value) zigzag_encode64(*value),
        from_u64(value) zigzag_decode64(value));

/// Enum fields are stored as their `i32` value and share `int32` encoding.
pub use self::int32 as enumeration;

/// Emits a module for a fixed-width little-endian kind.
macro_rules! fixed_width {
    ($ty:ty,
     $width:expr,
     $wire_type:expr,
     $proto_ty:ident,
     $put:ident,
     $read:ident,
     from_raw($raw:ident) $from_raw:expr) => {
        #[doc = concat!("`", stringify!($proto_ty), "` fields, fixed ", stringify!($width), "-byte encoding.")]
        pub mod $proto_ty {
            use super::*;

            const WIRE_TYPE: WireType = $wire_type;

            #[inline]
            fn write_raw<B: BufMut>(value: &$ty, buf: &mut B) {
                buf.$put(*value);
            }

            #[inline]
            fn read_raw(reader: &mut WireReader<'_>) -> Result<$ty> {
                let $raw = reader.$read()?;
                Ok($from_raw)
            }

            #[inline]
            fn raw_len(_: &$ty) -> usize {
                $width
            }

            pub fn encode<B: BufMut>(number: u32, value: &$ty, buf: &mut B) {
                encode_tag(number, WIRE_TYPE, buf);
                write_raw(value, buf);
            }

            pub fn merge(
                wire_type: WireType,
                value: &mut $ty,
                reader: &mut WireReader<'_>,
                _ctx: DecodeContext,
            ) -> Result<()> {
                check_wire_type(WIRE_TYPE, wire_type)?;
                *value = read_raw(reader)?;
                Ok(())
            }

            numeric_repeated!($ty);
        }
    };
}

fixed_width!(u32, 4, WireType::Fixed32, fixed32, put_u32_le, read_fixed32,
             from_raw(raw) raw);
fixed_width!(i32, 4, WireType::Fixed32, sfixed32, put_i32_le, read_fixed32,
             from_raw(raw) raw as i32);
fixed_width!(f32, 4, WireType::Fixed32, float, put_f32_le, read_fixed32,
             from_raw(raw) f32::from_bits(raw));
fixed_width!(u64, 8, WireType::Fixed64, fixed64, put_u64_le, read_fixed64,
             from_raw(raw) raw);
fixed_width!(i64, 8, WireType::Fixed64, sfixed64, put_i64_le, read_fixed64,
             from_raw(raw) raw as i64);
fixed_width!(f64, 8, WireType::Fixed64, double, put_f64_le, read_fixed64,
             from_raw(raw) f64::from_bits(raw));

/// Emits the length-delimited helpers shared by `string` and `bytes`.
macro_rules! length_delimited {
    ($ty:ty) => {
        pub fn encode<B: BufMut>(number: u32, value: &$ty, buf: &mut B) {
            encode_tag(number, WireType::LengthDelimited, buf);
            encode_varint(value.len() as u64, buf);
            buf.put_slice(value.as_ref());
        }

        pub fn encode_repeated<B: BufMut>(number: u32, values: &[$ty], buf: &mut B) {
            for value in values {
                encode(number, value, buf);
            }
        }

        pub fn merge_repeated(
            wire_type: WireType,
            values: &mut Vec<$ty>,
            reader: &mut WireReader<'_>,
            ctx: DecodeContext,
        ) -> Result<()> {
            let mut value = <$ty>::default();
            merge(wire_type, &mut value, reader, ctx)?;
            values.push(value);
            Ok(())
        }

        pub fn encoded_len(number: u32, value: &$ty) -> usize {
            tag_len(number) + encoded_len_varint(value.len() as u64) + value.len()
        }

        pub fn encoded_len_repeated(number: u32, values: &[$ty]) -> usize {
            values.iter().map(|value| encoded_len(number, value)).sum()
        }
    };
}

/// `string` fields; payloads must be UTF-8.
pub mod string {
    use super::*;

    pub fn merge(
        wire_type: WireType,
        value: &mut String,
        reader: &mut WireReader<'_>,
        _ctx: DecodeContext,
    ) -> Result<()> {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        let offset = reader.offset();
        let raw = reader.read_length_delimited()?;
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 { offset })?;
        value.clear();
        value.push_str(text);
        Ok(())
    }

    length_delimited!(String);
}

/// `bytes` fields.
pub mod bytes {
    use super::*;

    pub fn merge(
        wire_type: WireType,
        value: &mut Vec<u8>,
        reader: &mut WireReader<'_>,
        _ctx: DecodeContext,
    ) -> Result<()> {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        let raw = reader.read_length_delimited()?;
        value.clear();
        value.extend_from_slice(raw);
        Ok(())
    }

    length_delimited!(Vec<u8>);
}

/// Embedded message fields.
pub mod message {
    use super::*;

    pub fn encode<M: Message, B: BufMut>(number: u32, msg: &M, buf: &mut B) {
        encode_tag(number, WireType::LengthDelimited, buf);
        encode_varint(msg.encoded_len() as u64, buf);
        msg.encode_raw(buf);
    }

    /// Replaces `msg` with the decoded occurrence; a later occurrence of a
    /// singular message field overwrites rather than merges.
    pub fn merge<M: Message>(
        wire_type: WireType,
        msg: &mut M,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> Result<()> {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        if ctx.limit_reached() {
            return Err(DecodeError::RecursionLimitExceeded {
                offset: reader.offset(),
            });
        }
        let mut inner = reader.length_delimited()?;
        msg.clear();
        msg.merge_from_reader(&mut inner, ctx.enter_recursion())
    }

    pub fn encode_repeated<M: Message, B: BufMut>(number: u32, msgs: &[M], buf: &mut B) {
        for msg in msgs {
            encode(number, msg, buf);
        }
    }

    pub fn merge_repeated<M: Message>(
        wire_type: WireType,
        msgs: &mut Vec<M>,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> Result<()> {
        let mut msg = M::default();
        merge(wire_type, &mut msg, reader, ctx)?;
        msgs.push(msg);
        Ok(())
    }

    pub fn encoded_len<M: Message>(number: u32, msg: &M) -> usize {
        let len = msg.encoded_len();
        tag_len(number) + encoded_len_varint(len as u64) + len
    }

    pub fn encoded_len_repeated<M: Message>(number: u32, msgs: &[M]) -> usize {
        msgs.iter().map(|msg| encoded_len(number, msg)).sum()
    }
}

/// Map fields, encoded as repeated two-field entry messages.
///
/// The key is entry field 1 and the value entry field 2. Both are always
/// written. The key/value functions are the matching per-kind routines from
/// this module, e.g. `string::encode` and `int32::encoded_len`.
pub mod map {
    use super::*;

    const KEY: u32 = 1;
    const VALUE: u32 = 2;

    fn entry_len<K, V, KL, VL>(key_encoded_len: &KL, val_encoded_len: &VL, key: &K, val: &V) -> usize
    where
        KL: Fn(u32, &K) -> usize,
        VL: Fn(u32, &V) -> usize,
    {
        key_encoded_len(KEY, key) + val_encoded_len(VALUE, val)
    }

    pub fn encode<'a, K, V, I, B, KE, KL, VE, VL>(
        key_encode: KE,
        key_encoded_len: KL,
        val_encode: VE,
        val_encoded_len: VL,
        number: u32,
        entries: I,
        buf: &mut B,
    ) where
        K: 'a,
        V: 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
        B: BufMut,
        KE: Fn(u32, &K, &mut B),
        KL: Fn(u32, &K) -> usize,
        VE: Fn(u32, &V, &mut B),
        VL: Fn(u32, &V) -> usize,
    {
        for (key, val) in entries {
            let len = entry_len(&key_encoded_len, &val_encoded_len, key, val);
            encode_tag(number, WireType::LengthDelimited, buf);
            encode_varint(len as u64, buf);
            key_encode(KEY, key, buf);
            val_encode(VALUE, val, buf);
        }
    }

    /// Decodes one entry and inserts it; an entry whose key is already
    /// present replaces the earlier value.
    pub fn merge<K, V, T, KM, VM>(
        key_merge: KM,
        val_merge: VM,
        wire_type: WireType,
        map: &mut T,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> Result<()>
    where
        K: Default,
        V: Default,
        T: Extend<(K, V)>,
        KM: Fn(WireType, &mut K, &mut WireReader<'_>, DecodeContext) -> Result<()>,
        VM: Fn(WireType, &mut V, &mut WireReader<'_>, DecodeContext) -> Result<()>,
    {
        check_wire_type(WireType::LengthDelimited, wire_type)?;
        if ctx.limit_reached() {
            return Err(DecodeError::RecursionLimitExceeded {
                offset: reader.offset(),
            });
        }

        let mut entry = reader.length_delimited()?;
        let ctx = ctx.enter_recursion();
        let mut key = K::default();
        let mut val = V::default();

        while !entry.is_empty() {
            let (number, wire_type) = entry.read_tag()?;
            match number {
                KEY => key_merge(wire_type, &mut key, &mut entry, ctx)?,
                VALUE => val_merge(wire_type, &mut val, &mut entry, ctx)?,
                _ => skip_field(number, wire_type, &mut entry)?,
            }
        }

        map.extend(std::iter::once((key, val)));
        Ok(())
    }

    pub fn encoded_len<'a, K, V, I, KL, VL>(
        key_encoded_len: KL,
        val_encoded_len: VL,
        number: u32,
        entries: I,
    ) -> usize
    where
        K: 'a,
        V: 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
        KL: Fn(u32, &K) -> usize,
        VL: Fn(u32, &V) -> usize,
    {
        entries
            .into_iter()
            .map(|(key, val)| {
                let len = entry_len(&key_encoded_len, &val_encoded_len, key, val);
                tag_len(number) + encoded_len_varint(len as u64) + len
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::collections::HashMap;

    fn ctx() -> DecodeContext {
        DecodeContext::default()
    }

    /// Reads every tag in `data` and feeds it to `merge`.
    fn merge_all<T>(
        data: &[u8],
        target: &mut T,
        merge: impl Fn(WireType, &mut T, &mut WireReader<'_>, DecodeContext) -> Result<()>,
    ) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.is_empty() {
            let (_, wire_type) = reader.read_tag()?;
            merge(wire_type, target, &mut reader, ctx())?;
        }
        Ok(())
    }

    #[test]
    fn test_int32_encoding() {
        let mut buf = Vec::new();
        int32::encode(1, &150, &mut buf);
        assert_eq!(buf, [0x08, 0x96, 0x01]);
        assert_eq!(int32::encoded_len(1, &150), 3);
    }

    #[test]
    fn test_negative_int32_sign_extends() {
        let mut buf = Vec::new();
        int32::encode(1, &-1, &mut buf);
        assert_eq!(buf.len(), 11);
        assert_eq!(int32::encoded_len(1, &-1), 11);

        let mut value = 0;
        merge_all(&buf, &mut value, int32::merge).unwrap();
        assert_eq!(value, -1);
    }

    #[test]
    fn test_sint32_uses_zigzag() {
        let mut buf = Vec::new();
        sint32::encode(1, &-1, &mut buf);
        assert_eq!(buf, [0x08, 0x01]);

        let mut value = 0;
        merge_all(&buf, &mut value, sint32::merge).unwrap();
        assert_eq!(value, -1);
    }

    #[test]
    fn test_fixed_widths() {
        let mut buf = Vec::new();
        fixed32::encode(1, &1, &mut buf);
        assert_eq!(buf, [0x0D, 0x01, 0x00, 0x00, 0x00]);

        buf.clear();
        double::encode(2, &1.5, &mut buf);
        assert_eq!(buf[0], 0x11);
        assert_eq!(&buf[1..], 1.5f64.to_le_bytes());

        let mut value = 0.0;
        merge_all(&buf, &mut value, double::merge).unwrap();
        assert_eq!(value, 1.5);
    }

    #[test]
    fn test_packed_and_unpacked_decode_the_same() {
        let values = vec![1, -2, 300, i32::MAX];

        let mut packed = Vec::new();
        int32::encode_packed(4, &values, &mut packed);
        assert_eq!(packed.len(), int32::encoded_len_packed(4, &values));

        let mut unpacked = Vec::new();
        int32::encode_repeated(4, &values, &mut unpacked);
        assert_eq!(unpacked.len(), int32::encoded_len_repeated(4, &values));

        let mut from_packed = Vec::new();
        merge_all(&packed, &mut from_packed, int32::merge_repeated).unwrap();
        let mut from_unpacked = Vec::new();
        merge_all(&unpacked, &mut from_unpacked, int32::merge_repeated).unwrap();

        assert_eq!(from_packed, values);
        assert_eq!(from_unpacked, values);
    }

    #[test]
    fn test_mixed_packed_and_unpacked() {
        let mut buf = Vec::new();
        float::encode(3, &1.0, &mut buf);
        float::encode_packed(3, &[2.0, 3.0], &mut buf);
        float::encode(3, &4.0, &mut buf);

        let mut values = Vec::new();
        merge_all(&buf, &mut values, float::merge_repeated).unwrap();
        assert_eq!(values, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_packed_writes_nothing() {
        let mut buf = Vec::new();
        sfixed64::encode_packed(1, &[], &mut buf);
        assert!(buf.is_empty());
        assert_eq!(sfixed64::encoded_len_packed(1, &[]), 0);
    }

    #[test]
    fn test_wire_type_mismatch() {
        let mut buf = Vec::new();
        string::encode(1, &"x".to_string(), &mut buf);

        let mut value = 0u64;
        assert_eq!(
            merge_all(&buf, &mut value, uint64::merge),
            Err(DecodeError::wire_type_mismatch(
                WireType::Varint,
                WireType::LengthDelimited
            ))
        );

        let mut buf = Vec::new();
        fixed64::encode(1, &7, &mut buf);
        let mut values: Vec<u32> = Vec::new();
        assert!(matches!(
            merge_all(&buf, &mut values, fixed32::merge_repeated),
            Err(DecodeError::WireTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let data = [0x0A, 0x02, 0xC3, 0x28];
        let mut value = String::new();
        assert!(matches!(
            merge_all(&data, &mut value, string::merge),
            Err(DecodeError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_repeated_strings_keep_order() {
        let values = vec!["first".to_string(), "second".to_string()];
        let mut buf = Vec::new();
        string::encode_repeated(1, &values, &mut buf);
        assert_eq!(buf.len(), string::encoded_len_repeated(1, &values));

        let mut decoded = Vec::new();
        merge_all(&buf, &mut decoded, string::merge_repeated).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_map_last_entry_wins() {
        let mut buf = Vec::new();
        let first: HashMap<String, i32> = [("A".to_string(), 1)].into_iter().collect();
        let second: HashMap<String, i32> = [("A".to_string(), 9)].into_iter().collect();
        let third: HashMap<String, i32> = [("B".to_string(), 2)].into_iter().collect();
        for entries in [&first, &second, &third] {
            map::encode(
                string::encode,
                string::encoded_len,
                int32::encode,
                int32::encoded_len,
                5,
                entries,
                &mut buf,
            );
        }

        let mut decoded: HashMap<String, i32> = HashMap::new();
        merge_all(&buf, &mut decoded, |wire_type, target, reader, ctx| {
            map::merge(string::merge, int32::merge, wire_type, target, reader, ctx)
        })
        .unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded["A"], 9);
        assert_eq!(decoded["B"], 2);
    }

    #[test]
    fn test_map_encoded_len_matches() {
        let entries: HashMap<u32, String> = [(1, "one".to_string()), (300, String::new())]
            .into_iter()
            .collect();
        let mut buf = Vec::new();
        map::encode(
            uint32::encode,
            uint32::encoded_len,
            string::encode,
            string::encoded_len,
            2,
            &entries,
            &mut buf,
        );
        assert_eq!(
            buf.len(),
            map::encoded_len(uint32::encoded_len, string::encoded_len, 2, &entries)
        );
    }
}
