//! Message types shaped exactly like `protoc-gen-tagwire` output for:
//!
//! ```proto
//! syntax = "proto3";
//! package simple;
//!
//! message Test1 { int32 a = 1; }
//! message BasicRepeated {
//!   repeated bool a = 1 [packed = false];
//!   int32 b = 2;
//!   repeated float c = 3 [packed = true];
//! }
//! message RepeatedStrings { repeated string a = 1; int32 b = 2; }
//! message NestedMessage {
//!   message Inner { string b = 1; }
//!   Inner a = 1;
//! }
//! message BasicMap { map<string, int32> map_field = 1; }
//! enum Corpus { CORPUS_UNIVERSAL = 0; CORPUS_WEB = 1; CORPUS_NEWS = 2; }
//! message Foo {
//!   int32 a = 1; double b = 2; sint32 c = 3; int64 d = 4;
//!   repeated uint32 e = 5; uint64 f = 6; sint64 g = 7; fixed32 h = 8;
//!   fixed64 i = 9; sfixed32 j = 10; sfixed64 k = 11; float l = 12;
//!   Corpus m = 13; bytes n = 14; bool o = 15; repeated string p = 16;
//!   Foo child = 17;
//!   oneof choice { string name = 18; int32 id = 19; }
//! }
//! ```

#![allow(dead_code)]

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Test1 {
    pub a: i32,
}

impl ::tagwire::Message for Test1 {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        if self.a != 0 {
            ::tagwire::encoding::int32::encode(1, &self.a, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::int32::merge(wire_type, &mut self.a, reader, ctx),
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if self.a != 0 {
            len += ::tagwire::encoding::int32::encoded_len(1, &self.a);
        }
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct BasicRepeated {
    pub a: ::std::vec::Vec<bool>,
    pub b: i32,
    pub c: ::std::vec::Vec<f32>,
}

impl ::tagwire::Message for BasicRepeated {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        ::tagwire::encoding::bool::encode_repeated(1, &self.a, buf);
        if self.b != 0 {
            ::tagwire::encoding::int32::encode(2, &self.b, buf);
        }
        ::tagwire::encoding::float::encode_packed(3, &self.c, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::bool::merge_repeated(wire_type, &mut self.a, reader, ctx),
            2 => ::tagwire::encoding::int32::merge(wire_type, &mut self.b, reader, ctx),
            3 => ::tagwire::encoding::float::merge_repeated(wire_type, &mut self.c, reader, ctx),
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        len += ::tagwire::encoding::bool::encoded_len_repeated(1, &self.a);
        if self.b != 0 {
            len += ::tagwire::encoding::int32::encoded_len(2, &self.b);
        }
        len += ::tagwire::encoding::float::encoded_len_packed(3, &self.c);
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct RepeatedStrings {
    pub a: ::std::vec::Vec<::std::string::String>,
    pub b: i32,
}

impl ::tagwire::Message for RepeatedStrings {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        ::tagwire::encoding::string::encode_repeated(1, &self.a, buf);
        if self.b != 0 {
            ::tagwire::encoding::int32::encode(2, &self.b, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::string::merge_repeated(wire_type, &mut self.a, reader, ctx),
            2 => ::tagwire::encoding::int32::merge(wire_type, &mut self.b, reader, ctx),
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        len += ::tagwire::encoding::string::encoded_len_repeated(1, &self.a);
        if self.b != 0 {
            len += ::tagwire::encoding::int32::encoded_len(2, &self.b);
        }
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct NestedMessage {
    pub a: ::core::option::Option<nested_message::Inner>,
}

impl ::tagwire::Message for NestedMessage {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        if let ::core::option::Option::Some(value) = &self.a {
            ::tagwire::encoding::message::encode(1, value, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::message::merge(
                wire_type,
                self.a.get_or_insert_with(::core::default::Default::default),
                reader,
                ctx,
            ),
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if let ::core::option::Option::Some(value) = &self.a {
            len += ::tagwire::encoding::message::encoded_len(1, value);
        }
        len
    }
}

/// Nested message and enum types in `NestedMessage`.
pub mod nested_message {
    #[derive(Clone, PartialEq, Debug, Default)]
    pub struct Inner {
        pub b: ::std::string::String,
    }

    impl ::tagwire::Message for Inner {
        fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
            if !self.b.is_empty() {
                ::tagwire::encoding::string::encode(1, &self.b, buf);
            }
        }

        fn merge_field(
            &mut self,
            number: u32,
            wire_type: ::tagwire::WireType,
            reader: &mut ::tagwire::WireReader<'_>,
            ctx: ::tagwire::DecodeContext,
        ) -> ::tagwire::Result<()> {
            match number {
                1 => ::tagwire::encoding::string::merge(wire_type, &mut self.b, reader, ctx),
                _ => ::tagwire::wire::skip_field(number, wire_type, reader),
            }
        }

        fn encoded_len(&self) -> usize {
            let mut len = 0;
            if !self.b.is_empty() {
                len += ::tagwire::encoding::string::encoded_len(1, &self.b);
            }
            len
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct BasicMap {
    pub map_field: ::std::collections::HashMap<::std::string::String, i32>,
}

impl ::tagwire::Message for BasicMap {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        ::tagwire::encoding::map::encode(
            ::tagwire::encoding::string::encode,
            ::tagwire::encoding::string::encoded_len,
            ::tagwire::encoding::int32::encode,
            ::tagwire::encoding::int32::encoded_len,
            1,
            &self.map_field,
            buf,
        );
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::map::merge(
                ::tagwire::encoding::string::merge,
                ::tagwire::encoding::int32::merge,
                wire_type,
                &mut self.map_field,
                reader,
                ctx,
            ),
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        len += ::tagwire::encoding::map::encoded_len(
            ::tagwire::encoding::string::encoded_len,
            ::tagwire::encoding::int32::encoded_len,
            1,
            &self.map_field,
        );
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Foo {
    pub a: i32,
    pub b: f64,
    pub c: i32,
    pub d: i64,
    pub e: ::std::vec::Vec<u32>,
    pub f: u64,
    pub g: i64,
    pub h: u32,
    pub i: u64,
    pub j: i32,
    pub k: i64,
    pub l: f32,
    pub m: i32,
    pub n: ::std::vec::Vec<u8>,
    pub o: bool,
    pub p: ::std::vec::Vec<::std::string::String>,
    pub child: ::core::option::Option<::std::boxed::Box<Foo>>,
    pub choice: ::core::option::Option<foo::Choice>,
}

impl Foo {
    /// Returns `m` as `Corpus`, falling back to the default for unknown values.
    pub fn m(&self) -> Corpus {
        Corpus::try_from(self.m).unwrap_or_default()
    }
}

impl ::tagwire::Message for Foo {
    fn encode_raw<B: ::tagwire::bytes::BufMut>(&self, buf: &mut B) {
        if self.a != 0 {
            ::tagwire::encoding::int32::encode(1, &self.a, buf);
        }
        if self.b.to_bits() != 0 {
            ::tagwire::encoding::double::encode(2, &self.b, buf);
        }
        if self.c != 0 {
            ::tagwire::encoding::sint32::encode(3, &self.c, buf);
        }
        if self.d != 0 {
            ::tagwire::encoding::int64::encode(4, &self.d, buf);
        }
        ::tagwire::encoding::uint32::encode_packed(5, &self.e, buf);
        if self.f != 0 {
            ::tagwire::encoding::uint64::encode(6, &self.f, buf);
        }
        if self.g != 0 {
            ::tagwire::encoding::sint64::encode(7, &self.g, buf);
        }
        if self.h != 0 {
            ::tagwire::encoding::fixed32::encode(8, &self.h, buf);
        }
        if self.i != 0 {
            ::tagwire::encoding::fixed64::encode(9, &self.i, buf);
        }
        if self.j != 0 {
            ::tagwire::encoding::sfixed32::encode(10, &self.j, buf);
        }
        if self.k != 0 {
            ::tagwire::encoding::sfixed64::encode(11, &self.k, buf);
        }
        if self.l.to_bits() != 0 {
            ::tagwire::encoding::float::encode(12, &self.l, buf);
        }
        if self.m != 0 {
            ::tagwire::encoding::enumeration::encode(13, &self.m, buf);
        }
        if !self.n.is_empty() {
            ::tagwire::encoding::bytes::encode(14, &self.n, buf);
        }
        if self.o {
            ::tagwire::encoding::bool::encode(15, &self.o, buf);
        }
        ::tagwire::encoding::string::encode_repeated(16, &self.p, buf);
        if let ::core::option::Option::Some(value) = &self.child {
            ::tagwire::encoding::message::encode(17, &**value, buf);
        }
        if let ::core::option::Option::Some(foo::Choice::Name(value)) = &self.choice {
            ::tagwire::encoding::string::encode(18, value, buf);
        }
        if let ::core::option::Option::Some(foo::Choice::Id(value)) = &self.choice {
            ::tagwire::encoding::int32::encode(19, value, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: ::tagwire::WireType,
        reader: &mut ::tagwire::WireReader<'_>,
        ctx: ::tagwire::DecodeContext,
    ) -> ::tagwire::Result<()> {
        match number {
            1 => ::tagwire::encoding::int32::merge(wire_type, &mut self.a, reader, ctx),
            2 => ::tagwire::encoding::double::merge(wire_type, &mut self.b, reader, ctx),
            3 => ::tagwire::encoding::sint32::merge(wire_type, &mut self.c, reader, ctx),
            4 => ::tagwire::encoding::int64::merge(wire_type, &mut self.d, reader, ctx),
            5 => ::tagwire::encoding::uint32::merge_repeated(wire_type, &mut self.e, reader, ctx),
            6 => ::tagwire::encoding::uint64::merge(wire_type, &mut self.f, reader, ctx),
            7 => ::tagwire::encoding::sint64::merge(wire_type, &mut self.g, reader, ctx),
            8 => ::tagwire::encoding::fixed32::merge(wire_type, &mut self.h, reader, ctx),
            9 => ::tagwire::encoding::fixed64::merge(wire_type, &mut self.i, reader, ctx),
            10 => ::tagwire::encoding::sfixed32::merge(wire_type, &mut self.j, reader, ctx),
            11 => ::tagwire::encoding::sfixed64::merge(wire_type, &mut self.k, reader, ctx),
            12 => ::tagwire::encoding::float::merge(wire_type, &mut self.l, reader, ctx),
            13 => ::tagwire::encoding::enumeration::merge(wire_type, &mut self.m, reader, ctx),
            14 => ::tagwire::encoding::bytes::merge(wire_type, &mut self.n, reader, ctx),
            15 => ::tagwire::encoding::bool::merge(wire_type, &mut self.o, reader, ctx),
            16 => ::tagwire::encoding::string::merge_repeated(wire_type, &mut self.p, reader, ctx),
            17 => ::tagwire::encoding::message::merge(
                wire_type,
                &mut **self.child.get_or_insert_with(::core::default::Default::default),
                reader,
                ctx,
            ),
            18 => {
                let mut value: ::std::string::String = ::core::default::Default::default();
                ::tagwire::encoding::string::merge(wire_type, &mut value, reader, ctx)?;
                self.choice = ::core::option::Option::Some(foo::Choice::Name(value));
                ::core::result::Result::Ok(())
            }
            19 => {
                let mut value: i32 = ::core::default::Default::default();
                ::tagwire::encoding::int32::merge(wire_type, &mut value, reader, ctx)?;
                self.choice = ::core::option::Option::Some(foo::Choice::Id(value));
                ::core::result::Result::Ok(())
            }
            _ => ::tagwire::wire::skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if self.a != 0 {
            len += ::tagwire::encoding::int32::encoded_len(1, &self.a);
        }
        if self.b.to_bits() != 0 {
            len += ::tagwire::encoding::double::encoded_len(2, &self.b);
        }
        if self.c != 0 {
            len += ::tagwire::encoding::sint32::encoded_len(3, &self.c);
        }
        if self.d != 0 {
            len += ::tagwire::encoding::int64::encoded_len(4, &self.d);
        }
        len += ::tagwire::encoding::uint32::encoded_len_packed(5, &self.e);
        if self.f != 0 {
            len += ::tagwire::encoding::uint64::encoded_len(6, &self.f);
        }
        if self.g != 0 {
            len += ::tagwire::encoding::sint64::encoded_len(7, &self.g);
        }
        if self.h != 0 {
            len += ::tagwire::encoding::fixed32::encoded_len(8, &self.h);
        }
        if self.i != 0 {
            len += ::tagwire::encoding::fixed64::encoded_len(9, &self.i);
        }
        if self.j != 0 {
            len += ::tagwire::encoding::sfixed32::encoded_len(10, &self.j);
        }
        if self.k != 0 {
            len += ::tagwire::encoding::sfixed64::encoded_len(11, &self.k);
        }
        if self.l.to_bits() != 0 {
            len += ::tagwire::encoding::float::encoded_len(12, &self.l);
        }
        if self.m != 0 {
            len += ::tagwire::encoding::enumeration::encoded_len(13, &self.m);
        }
        if !self.n.is_empty() {
            len += ::tagwire::encoding::bytes::encoded_len(14, &self.n);
        }
        if self.o {
            len += ::tagwire::encoding::bool::encoded_len(15, &self.o);
        }
        len += ::tagwire::encoding::string::encoded_len_repeated(16, &self.p);
        if let ::core::option::Option::Some(value) = &self.child {
            len += ::tagwire::encoding::message::encoded_len(17, &**value);
        }
        if let ::core::option::Option::Some(foo::Choice::Name(value)) = &self.choice {
            len += ::tagwire::encoding::string::encoded_len(18, value);
        }
        if let ::core::option::Option::Some(foo::Choice::Id(value)) = &self.choice {
            len += ::tagwire::encoding::int32::encoded_len(19, value);
        }
        len
    }
}

/// Nested message and enum types in `Foo`.
pub mod foo {
    #[derive(Clone, PartialEq, Debug)]
    pub enum Choice {
        Name(::std::string::String),
        Id(i32),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Corpus {
    Universal = 0,
    Web = 1,
    News = 2,
}

impl Corpus {
    /// Name of the value as written in the `.proto` definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Universal => "CORPUS_UNIVERSAL",
            Self::Web => "CORPUS_WEB",
            Self::News => "CORPUS_NEWS",
        }
    }

    /// Looks up a value by its `.proto` name.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "CORPUS_UNIVERSAL" => ::core::option::Option::Some(Self::Universal),
            "CORPUS_WEB" => ::core::option::Option::Some(Self::Web),
            "CORPUS_NEWS" => ::core::option::Option::Some(Self::News),
            _ => ::core::option::Option::None,
        }
    }
}

impl ::core::default::Default for Corpus {
    fn default() -> Self {
        Self::Universal
    }
}

impl ::core::convert::TryFrom<i32> for Corpus {
    type Error = i32;

    fn try_from(value: i32) -> ::core::result::Result<Self, i32> {
        match value {
            0 => ::core::result::Result::Ok(Self::Universal),
            1 => ::core::result::Result::Ok(Self::Web),
            2 => ::core::result::Result::Ok(Self::News),
            other => ::core::result::Result::Err(other),
        }
    }
}

impl ::core::convert::From<Corpus> for i32 {
    fn from(value: Corpus) -> i32 {
        value as i32
    }
}
