//! Resolved schema model.
//!
//! A [`Schema`] is an arena holding every file, message and enum of one
//! invocation. Entities refer to each other through typed indices
//! ([`FileId`], [`MessageId`], [`EnumId`]) instead of names or pointers, so
//! self-referential and mutually recursive messages need no special
//! handling. The arena is built once by the resolver and then only read.

use std::collections::{HashMap, HashSet};
use tagwire::WireType;

/// Index of a file in a [`Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

/// Index of a message in a [`Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) usize);

/// Index of an enum in a [`Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub(crate) usize);

/// The fifteen non-composite protobuf field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// Name of the type in `.proto` syntax, which is also the name of its
    /// `tagwire::encoding` module
    pub fn proto_name(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Wire type of a single, unpacked value
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Int32
            | Self::Int64
            | Self::Uint32
            | Self::Uint64
            | Self::Sint32
            | Self::Sint64
            | Self::Bool => WireType::Varint,
            Self::Fixed64 | Self::Sfixed64 | Self::Double => WireType::Fixed64,
            Self::Fixed32 | Self::Sfixed32 | Self::Float => WireType::Fixed32,
            Self::String | Self::Bytes => WireType::LengthDelimited,
        }
    }

    /// Numeric kinds may use the packed repeated encoding
    pub fn is_packable(&self) -> bool {
        !matches!(self, Self::String | Self::Bytes)
    }

    /// Allowed as a map key: integral kinds, `bool` and `string`
    pub fn is_valid_map_key(&self) -> bool {
        !matches!(self, Self::Double | Self::Float | Self::Bytes)
    }

    /// True for `float` and `double`
    pub fn is_floating_point(&self) -> bool {
        matches!(self, Self::Double | Self::Float)
    }
}

/// A field's value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum(EnumId),
    Message(MessageId),
}

impl FieldType {
    /// True for scalar numeric and enum types
    pub fn is_packable(&self) -> bool {
        match self {
            Self::Scalar(scalar) => scalar.is_packable(),
            Self::Enum(_) => true,
            Self::Message(_) => false,
        }
    }
}

/// Field cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// Key and value of a map field, taken from its synthesized entry message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    /// The synthesized `XxxEntry` message
    pub entry: MessageId,
    pub key: ScalarType,
    pub value: FieldType,
}

/// A resolved field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: u32,
    pub ty: FieldType,
    pub cardinality: Cardinality,
    /// Effective packed flag; only ever true for repeated packable fields
    pub packed: bool,
    /// Set when this is a map field
    pub map: Option<MapEntry>,
    /// Index into the owning message's [`oneofs`](MessageDescriptor::oneofs)
    pub oneof: Option<usize>,
}

impl FieldDescriptor {
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// A oneof declaration and its member fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    pub name: String,
    /// Indices into the owning message's fields, in declaration order
    pub fields: Vec<usize>,
}

/// A resolved message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    pub name: String,
    /// Fully qualified name without the leading dot
    pub full_name: String,
    pub file: FileId,
    pub parent: Option<MessageId>,
    pub fields: Vec<FieldDescriptor>,
    pub oneofs: Vec<OneofDescriptor>,
    pub nested_messages: Vec<MessageId>,
    pub nested_enums: Vec<EnumId>,
    pub is_map_entry: bool,
}

impl MessageDescriptor {
    /// Fields sorted by number
    pub fn fields_by_number(&self) -> Vec<&FieldDescriptor> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.number);
        fields
    }
}

/// One enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// A resolved enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    /// Fully qualified name without the leading dot
    pub full_name: String,
    pub file: FileId,
    pub parent: Option<MessageId>,
    /// Values in declaration order; numbers may repeat
    pub values: Vec<EnumValue>,
}

impl EnumDescriptor {
    /// The first value with a non-negative number, else the first value
    pub fn default_value(&self) -> Option<&EnumValue> {
        self.values
            .iter()
            .find(|value| value.number >= 0)
            .or_else(|| self.values.first())
    }
}

/// A resolved file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Name as given to protoc, e.g. `foo/bar.proto`
    pub name: String,
    pub package: String,
    pub syntax: String,
    pub dependencies: Vec<FileId>,
    /// Top-level messages in declaration order
    pub messages: Vec<MessageId>,
    /// Top-level enums in declaration order
    pub enums: Vec<EnumId>,
    /// Hex blake3 digest of the encoded source descriptor
    pub digest: String,
}

/// Every resolved entity of one invocation
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) files: Vec<FileDescriptor>,
    pub(crate) messages: Vec<MessageDescriptor>,
    pub(crate) enums: Vec<EnumDescriptor>,
    pub(crate) files_by_name: HashMap<String, FileId>,
}

impl Schema {
    pub fn file(&self, id: FileId) -> &FileDescriptor {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &MessageDescriptor {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumDescriptor {
        &self.enums[id.0]
    }

    /// Looks up a file by the name protoc gave it
    pub fn file_by_name(&self, name: &str) -> Option<FileId> {
        self.files_by_name.get(name).copied()
    }

    /// Files in dependency order: every file after all of its imports
    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileDescriptor)> {
        self.files.iter().enumerate().map(|(i, file)| (FileId(i), file))
    }

    /// Looks up a message by fully qualified name, with or without the
    /// leading dot
    pub fn message_by_name(&self, name: &str) -> Option<MessageId> {
        let name = name.strip_prefix('.').unwrap_or(name);
        self.messages
            .iter()
            .position(|message| message.full_name == name)
            .map(MessageId)
    }

    /// Looks up an enum by fully qualified name, with or without the
    /// leading dot
    pub fn enum_by_name(&self, name: &str) -> Option<EnumId> {
        let name = name.strip_prefix('.').unwrap_or(name);
        self.enums
            .iter()
            .position(|enumeration| enumeration.full_name == name)
            .map(EnumId)
    }

    /// Messages enclosing `id`, outermost first
    pub fn message_ancestors(&self, mut parent: Option<MessageId>) -> Vec<MessageId> {
        let mut chain = Vec::new();
        while let Some(id) = parent {
            chain.push(id);
            parent = self.message(id).parent;
        }
        chain.reverse();
        chain
    }

    /// Returns true if a value of message `inner` can contain a value of
    /// message `outer` through singular or oneof message fields.
    ///
    /// A singular field of type `inner` inside `outer` must be boxed when
    /// this holds, or the generated struct would have infinite size.
    /// Repeated and map fields already live on the heap and break the chain.
    pub fn is_recursive(&self, outer: MessageId, inner: MessageId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![inner];

        while let Some(current) = stack.pop() {
            if current == outer {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for field in &self.message(current).fields {
                if let (FieldType::Message(next), Cardinality::Singular) = (field.ty, field.cardinality) {
                    stack.push(next);
                }
            }
        }

        false
    }
}
