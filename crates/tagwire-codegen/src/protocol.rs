//! Messages exchanged with `protoc` and the descriptor subset they carry.
//!
//! These are ordinary [`Message`] implementations on the tagwire runtime,
//! written in the same shape the generator emits, using the field numbers
//! of `google/protobuf/compiler/plugin.proto` and
//! `google/protobuf/descriptor.proto`. Descriptor fields this crate has no
//! use for (source info, extensions, most options) are skipped on decode.
//!
//! The descriptor schema is proto2, so fields whose presence matters are
//! held as `Option`.

use tagwire::bytes::BufMut;
use tagwire::wire::skip_field;
use tagwire::{encoding, DecodeContext, Message, WireReader, WireType};

/// The compiler version reported by `protoc`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub suffix: String,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.suffix.is_empty() {
            write!(f, "-{}", self.suffix)?;
        }
        Ok(())
    }
}

impl Message for Version {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if self.major != 0 {
            encoding::int32::encode(1, &self.major, buf);
        }
        if self.minor != 0 {
            encoding::int32::encode(2, &self.minor, buf);
        }
        if self.patch != 0 {
            encoding::int32::encode(3, &self.patch, buf);
        }
        if !self.suffix.is_empty() {
            encoding::string::encode(4, &self.suffix, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::int32::merge(wire_type, &mut self.major, reader, ctx),
            2 => encoding::int32::merge(wire_type, &mut self.minor, reader, ctx),
            3 => encoding::int32::merge(wire_type, &mut self.patch, reader, ctx),
            4 => encoding::string::merge(wire_type, &mut self.suffix, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if self.major != 0 {
            len += encoding::int32::encoded_len(1, &self.major);
        }
        if self.minor != 0 {
            len += encoding::int32::encoded_len(2, &self.minor);
        }
        if self.patch != 0 {
            len += encoding::int32::encoded_len(3, &self.patch);
        }
        if !self.suffix.is_empty() {
            len += encoding::string::encoded_len(4, &self.suffix);
        }
        len
    }
}

/// What `protoc` sends to the plugin on stdin.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CodeGeneratorRequest {
    /// Files named on the command line, in order
    pub file_to_generate: Vec<String>,
    /// The `--tagwire_opt` string
    pub parameter: String,
    /// `file_to_generate` plus everything they import, dependencies first
    pub proto_file: Vec<FileDescriptorProto>,
    pub compiler_version: Option<Version>,
}

impl Message for CodeGeneratorRequest {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        encoding::string::encode_repeated(1, &self.file_to_generate, buf);
        if !self.parameter.is_empty() {
            encoding::string::encode(2, &self.parameter, buf);
        }
        if let Some(value) = &self.compiler_version {
            encoding::message::encode(3, value, buf);
        }
        encoding::message::encode_repeated(15, &self.proto_file, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge_repeated(wire_type, &mut self.file_to_generate, reader, ctx),
            2 => encoding::string::merge(wire_type, &mut self.parameter, reader, ctx),
            3 => encoding::message::merge(
                wire_type,
                self.compiler_version.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            15 => encoding::message::merge_repeated(wire_type, &mut self.proto_file, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        len += encoding::string::encoded_len_repeated(1, &self.file_to_generate);
        if !self.parameter.is_empty() {
            len += encoding::string::encoded_len(2, &self.parameter);
        }
        if let Some(value) = &self.compiler_version {
            len += encoding::message::encoded_len(3, value);
        }
        len += encoding::message::encoded_len_repeated(15, &self.proto_file);
        len
    }
}

/// What the plugin writes to stdout.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CodeGeneratorResponse {
    /// Set when generation failed; `file` is then empty
    pub error: Option<String>,
    /// Bitmask of [`code_generator_response::Feature`] values
    pub supported_features: u64,
    pub file: Vec<code_generator_response::File>,
}

impl CodeGeneratorResponse {
    /// A response reporting `message` and nothing else.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

impl Message for CodeGeneratorResponse {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if let Some(value) = &self.error {
            encoding::string::encode(1, value, buf);
        }
        if self.supported_features != 0 {
            encoding::uint64::encode(2, &self.supported_features, buf);
        }
        encoding::message::encode_repeated(15, &self.file, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(
                wire_type,
                self.error.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            2 => encoding::uint64::merge(wire_type, &mut self.supported_features, reader, ctx),
            15 => encoding::message::merge_repeated(wire_type, &mut self.file, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if let Some(value) = &self.error {
            len += encoding::string::encoded_len(1, value);
        }
        if self.supported_features != 0 {
            len += encoding::uint64::encoded_len(2, &self.supported_features);
        }
        len += encoding::message::encoded_len_repeated(15, &self.file);
        len
    }
}

/// Nested types in `CodeGeneratorResponse`.
pub mod code_generator_response {
    use super::*;

    /// Optional features a plugin may declare support for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[repr(i32)]
    pub enum Feature {
        None = 0,
        Proto3Optional = 1,
    }

    impl From<Feature> for u64 {
        fn from(value: Feature) -> u64 {
            value as u64
        }
    }

    /// One generated output file.
    #[derive(Clone, PartialEq, Debug, Default)]
    pub struct File {
        /// Path relative to the output directory, `/`-separated
        pub name: String,
        pub insertion_point: String,
        pub content: String,
    }

    impl Message for File {
        fn encode_raw<B: BufMut>(&self, buf: &mut B) {
            if !self.name.is_empty() {
                encoding::string::encode(1, &self.name, buf);
            }
            if !self.insertion_point.is_empty() {
                encoding::string::encode(2, &self.insertion_point, buf);
            }
            if !self.content.is_empty() {
                encoding::string::encode(15, &self.content, buf);
            }
        }

        fn merge_field(
            &mut self,
            number: u32,
            wire_type: WireType,
            reader: &mut WireReader<'_>,
            ctx: DecodeContext,
        ) -> tagwire::Result<()> {
            match number {
                1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
                2 => encoding::string::merge(wire_type, &mut self.insertion_point, reader, ctx),
                15 => encoding::string::merge(wire_type, &mut self.content, reader, ctx),
                _ => skip_field(number, wire_type, reader),
            }
        }

        fn encoded_len(&self) -> usize {
            let mut len = 0;
            if !self.name.is_empty() {
                len += encoding::string::encoded_len(1, &self.name);
            }
            if !self.insertion_point.is_empty() {
                len += encoding::string::encoded_len(2, &self.insertion_point);
            }
            if !self.content.is_empty() {
                len += encoding::string::encoded_len(15, &self.content);
            }
            len
        }
    }
}

/// The output of `protoc --descriptor_set_out`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FileDescriptorSet {
    pub file: Vec<FileDescriptorProto>,
}

impl Message for FileDescriptorSet {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        encoding::message::encode_repeated(1, &self.file, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::message::merge_repeated(wire_type, &mut self.file, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::message::encoded_len_repeated(1, &self.file)
    }
}

/// One parsed `.proto` file.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FileDescriptorProto {
    /// Path relative to the import root, e.g. `foo/bar.proto`
    pub name: String,
    pub package: String,
    /// Imported file names
    pub dependency: Vec<String>,
    pub message_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
    /// `proto2`, `proto3`, `editions`, or empty for proto2
    pub syntax: String,
}

impl Message for FileDescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
        if !self.package.is_empty() {
            encoding::string::encode(2, &self.package, buf);
        }
        encoding::string::encode_repeated(3, &self.dependency, buf);
        encoding::message::encode_repeated(4, &self.message_type, buf);
        encoding::message::encode_repeated(5, &self.enum_type, buf);
        if !self.syntax.is_empty() {
            encoding::string::encode(12, &self.syntax, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            2 => encoding::string::merge(wire_type, &mut self.package, reader, ctx),
            3 => encoding::string::merge_repeated(wire_type, &mut self.dependency, reader, ctx),
            4 => encoding::message::merge_repeated(wire_type, &mut self.message_type, reader, ctx),
            5 => encoding::message::merge_repeated(wire_type, &mut self.enum_type, reader, ctx),
            12 => encoding::string::merge(wire_type, &mut self.syntax, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += encoding::string::encoded_len(1, &self.name);
        }
        if !self.package.is_empty() {
            len += encoding::string::encoded_len(2, &self.package);
        }
        len += encoding::string::encoded_len_repeated(3, &self.dependency);
        len += encoding::message::encoded_len_repeated(4, &self.message_type);
        len += encoding::message::encoded_len_repeated(5, &self.enum_type);
        if !self.syntax.is_empty() {
            len += encoding::string::encoded_len(12, &self.syntax);
        }
        len
    }
}

/// A message declaration.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DescriptorProto {
    pub name: String,
    pub field: Vec<FieldDescriptorProto>,
    pub nested_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
    pub options: Option<MessageOptions>,
    pub oneof_decl: Vec<OneofDescriptorProto>,
}

impl DescriptorProto {
    /// True for the entry types `protoc` synthesizes for map fields.
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|options| options.map_entry)
            .unwrap_or(false)
    }
}

impl Message for DescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
        encoding::message::encode_repeated(2, &self.field, buf);
        encoding::message::encode_repeated(3, &self.nested_type, buf);
        encoding::message::encode_repeated(4, &self.enum_type, buf);
        if let Some(value) = &self.options {
            encoding::message::encode(7, value, buf);
        }
        encoding::message::encode_repeated(8, &self.oneof_decl, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            2 => encoding::message::merge_repeated(wire_type, &mut self.field, reader, ctx),
            3 => encoding::message::merge_repeated(wire_type, &mut self.nested_type, reader, ctx),
            4 => encoding::message::merge_repeated(wire_type, &mut self.enum_type, reader, ctx),
            7 => encoding::message::merge(
                wire_type,
                self.options.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            8 => encoding::message::merge_repeated(wire_type, &mut self.oneof_decl, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += encoding::string::encoded_len(1, &self.name);
        }
        len += encoding::message::encoded_len_repeated(2, &self.field);
        len += encoding::message::encoded_len_repeated(3, &self.nested_type);
        len += encoding::message::encoded_len_repeated(4, &self.enum_type);
        if let Some(value) = &self.options {
            len += encoding::message::encoded_len(7, value);
        }
        len += encoding::message::encoded_len_repeated(8, &self.oneof_decl);
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct MessageOptions {
    pub map_entry: Option<bool>,
}

impl Message for MessageOptions {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if let Some(value) = &self.map_entry {
            encoding::bool::encode(7, value, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            7 => encoding::bool::merge(
                wire_type,
                self.map_entry.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        match &self.map_entry {
            Some(value) => encoding::bool::encoded_len(7, value),
            None => 0,
        }
    }
}

/// A field declaration.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FieldDescriptorProto {
    pub name: String,
    pub number: i32,
    /// A [`field_descriptor_proto::Label`] value
    pub label: i32,
    /// A [`field_descriptor_proto::Type`] value
    pub r#type: i32,
    /// For message and enum types, the referenced type's name
    pub type_name: String,
    pub options: Option<FieldOptions>,
    /// Index into the containing message's `oneof_decl`
    pub oneof_index: Option<i32>,
    pub json_name: String,
    /// Set for proto3 `optional`; the field's oneof is synthetic
    pub proto3_optional: bool,
}

impl FieldDescriptorProto {
    /// The explicit `packed` option, if any.
    pub fn packed(&self) -> Option<bool> {
        self.options.as_ref().and_then(|options| options.packed)
    }
}

impl Message for FieldDescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
        if self.number != 0 {
            encoding::int32::encode(3, &self.number, buf);
        }
        if self.label != 0 {
            encoding::enumeration::encode(4, &self.label, buf);
        }
        if self.r#type != 0 {
            encoding::enumeration::encode(5, &self.r#type, buf);
        }
        if !self.type_name.is_empty() {
            encoding::string::encode(6, &self.type_name, buf);
        }
        if let Some(value) = &self.options {
            encoding::message::encode(8, value, buf);
        }
        if let Some(value) = &self.oneof_index {
            encoding::int32::encode(9, value, buf);
        }
        if !self.json_name.is_empty() {
            encoding::string::encode(10, &self.json_name, buf);
        }
        if self.proto3_optional {
            encoding::bool::encode(17, &self.proto3_optional, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            3 => encoding::int32::merge(wire_type, &mut self.number, reader, ctx),
            4 => encoding::enumeration::merge(wire_type, &mut self.label, reader, ctx),
            5 => encoding::enumeration::merge(wire_type, &mut self.r#type, reader, ctx),
            6 => encoding::string::merge(wire_type, &mut self.type_name, reader, ctx),
            8 => encoding::message::merge(
                wire_type,
                self.options.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            9 => encoding::int32::merge(
                wire_type,
                self.oneof_index.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            10 => encoding::string::merge(wire_type, &mut self.json_name, reader, ctx),
            17 => encoding::bool::merge(wire_type, &mut self.proto3_optional, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += encoding::string::encoded_len(1, &self.name);
        }
        if self.number != 0 {
            len += encoding::int32::encoded_len(3, &self.number);
        }
        if self.label != 0 {
            len += encoding::enumeration::encoded_len(4, &self.label);
        }
        if self.r#type != 0 {
            len += encoding::enumeration::encoded_len(5, &self.r#type);
        }
        if !self.type_name.is_empty() {
            len += encoding::string::encoded_len(6, &self.type_name);
        }
        if let Some(value) = &self.options {
            len += encoding::message::encoded_len(8, value);
        }
        if let Some(value) = &self.oneof_index {
            len += encoding::int32::encoded_len(9, value);
        }
        if !self.json_name.is_empty() {
            len += encoding::string::encoded_len(10, &self.json_name);
        }
        if self.proto3_optional {
            len += encoding::bool::encoded_len(17, &self.proto3_optional);
        }
        len
    }
}

/// Nested types in `FieldDescriptorProto`.
pub mod field_descriptor_proto {
    /// Field cardinality as written in the descriptor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[repr(i32)]
    pub enum Label {
        Optional = 1,
        Required = 2,
        Repeated = 3,
    }

    impl TryFrom<i32> for Label {
        type Error = i32;

        fn try_from(value: i32) -> Result<Self, i32> {
            match value {
                1 => Ok(Self::Optional),
                2 => Ok(Self::Required),
                3 => Ok(Self::Repeated),
                other => Err(other),
            }
        }
    }

    /// Field type codes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[repr(i32)]
    pub enum Type {
        Double = 1,
        Float = 2,
        Int64 = 3,
        Uint64 = 4,
        Int32 = 5,
        Fixed64 = 6,
        Fixed32 = 7,
        Bool = 8,
        String = 9,
        Group = 10,
        Message = 11,
        Bytes = 12,
        Uint32 = 13,
        Enum = 14,
        Sfixed32 = 15,
        Sfixed64 = 16,
        Sint32 = 17,
        Sint64 = 18,
    }

    impl TryFrom<i32> for Type {
        type Error = i32;

        fn try_from(value: i32) -> Result<Self, i32> {
            Ok(match value {
                1 => Self::Double,
                2 => Self::Float,
                3 => Self::Int64,
                4 => Self::Uint64,
                5 => Self::Int32,
                6 => Self::Fixed64,
                7 => Self::Fixed32,
                8 => Self::Bool,
                9 => Self::String,
                10 => Self::Group,
                11 => Self::Message,
                12 => Self::Bytes,
                13 => Self::Uint32,
                14 => Self::Enum,
                15 => Self::Sfixed32,
                16 => Self::Sfixed64,
                17 => Self::Sint32,
                18 => Self::Sint64,
                other => return Err(other),
            })
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct FieldOptions {
    pub packed: Option<bool>,
}

impl Message for FieldOptions {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if let Some(value) = &self.packed {
            encoding::bool::encode(2, value, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            2 => encoding::bool::merge(
                wire_type,
                self.packed.get_or_insert_with(Default::default),
                reader,
                ctx,
            ),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        match &self.packed {
            Some(value) => encoding::bool::encoded_len(2, value),
            None => 0,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct OneofDescriptorProto {
    pub name: String,
}

impl Message for OneofDescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        if self.name.is_empty() {
            0
        } else {
            encoding::string::encoded_len(1, &self.name)
        }
    }
}

/// An enum declaration.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct EnumDescriptorProto {
    pub name: String,
    pub value: Vec<EnumValueDescriptorProto>,
}

impl Message for EnumDescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
        encoding::message::encode_repeated(2, &self.value, buf);
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            2 => encoding::message::merge_repeated(wire_type, &mut self.value, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += encoding::string::encoded_len(1, &self.name);
        }
        len += encoding::message::encoded_len_repeated(2, &self.value);
        len
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct EnumValueDescriptorProto {
    pub name: String,
    pub number: i32,
}

impl Message for EnumValueDescriptorProto {
    fn encode_raw<B: BufMut>(&self, buf: &mut B) {
        if !self.name.is_empty() {
            encoding::string::encode(1, &self.name, buf);
        }
        if self.number != 0 {
            encoding::int32::encode(2, &self.number, buf);
        }
    }

    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut WireReader<'_>,
        ctx: DecodeContext,
    ) -> tagwire::Result<()> {
        match number {
            1 => encoding::string::merge(wire_type, &mut self.name, reader, ctx),
            2 => encoding::int32::merge(wire_type, &mut self.number, reader, ctx),
            _ => skip_field(number, wire_type, reader),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += encoding::string::encoded_len(1, &self.name);
        }
        if self.number != 0 {
            len += encoding::int32::encoded_len(2, &self.number);
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_round_trip() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["simple.proto".into()],
            parameter: "btree_map".into(),
            proto_file: vec![FileDescriptorProto {
                name: "simple.proto".into(),
                syntax: "proto3".into(),
                message_type: vec![DescriptorProto {
                    name: "Test1".into(),
                    field: vec![FieldDescriptorProto {
                        name: "a".into(),
                        number: 1,
                        label: field_descriptor_proto::Label::Optional as i32,
                        r#type: field_descriptor_proto::Type::Int32 as i32,
                        oneof_index: Some(0),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            compiler_version: Some(Version {
                major: 3,
                minor: 21,
                patch: 12,
                suffix: String::new(),
            }),
        };

        let decoded = CodeGeneratorRequest::decode(&request.encode_to_vec()).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.compiler_version.unwrap().to_string(), "3.21.12");
    }

    #[test]
    fn test_presence_of_zero_values() {
        let field = FieldDescriptorProto {
            oneof_index: Some(0),
            options: Some(FieldOptions {
                packed: Some(false),
            }),
            ..Default::default()
        };
        let decoded = FieldDescriptorProto::decode(&field.encode_to_vec()).unwrap();
        assert_eq!(decoded.oneof_index, Some(0));
        assert_eq!(decoded.packed(), Some(false));

        let decoded = FieldDescriptorProto::decode(&[]).unwrap();
        assert_eq!(decoded.oneof_index, None);
        assert_eq!(decoded.packed(), None);
    }

    #[test]
    fn test_error_response() {
        let response = CodeGeneratorResponse::from_error("boom");
        let bytes = response.encode_to_vec();
        assert_eq!(bytes, [0x0A, 0x04, b'b', b'o', b'o', b'm']);

        let empty_error = CodeGeneratorResponse::from_error("");
        let decoded = CodeGeneratorResponse::decode(&empty_error.encode_to_vec()).unwrap();
        assert_eq!(decoded.error.as_deref(), Some(""));
    }

    #[test]
    fn test_label_and_type_codes() {
        use field_descriptor_proto::{Label, Type};
        assert_eq!(Label::try_from(3i32), Ok(Label::Repeated));
        assert_eq!(Label::try_from(9i32), Err(9));
        assert_eq!(Type::try_from(10i32), Ok(Type::Group));
        assert_eq!(Type::try_from(0i32), Err(0));
    }
}
