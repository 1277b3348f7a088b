//! Turns raw file descriptors into a resolved [`Schema`].
//!
//! Resolution runs in three passes over the files in dependency order:
//!
//! 1. Declare every message and enum, assigning arena indices and
//!    registering fully qualified names.
//! 2. Resolve fields: validate numbers, labels, types and `packed`, and bind
//!    every type name to an index using protobuf scoping rules.
//! 3. Attach map entries to the map fields that use them.
//!
//! A failure anywhere aborts the whole resolution.

use crate::descriptor::{
    Cardinality, EnumDescriptor, EnumId, EnumValue, FieldDescriptor, FieldType, FileDescriptor,
    FileId, MapEntry, MessageDescriptor, MessageId, OneofDescriptor, ScalarType, Schema,
};
use crate::error::{Error, Result};
use crate::protocol::field_descriptor_proto::{Label, Type};
use crate::protocol::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use std::collections::{HashMap, HashSet};
use tagwire::wire::is_valid_field_number;
use tagwire::Message;
use tracing::{debug, trace};

/// Length of the hex digest recorded per file
const DIGEST_LEN: usize = 16;

/// Resolves `files` into a [`Schema`].
///
/// `files` must contain every file any of them imports; order does not
/// matter.
pub fn resolve(files: &[FileDescriptorProto]) -> Result<Schema> {
    let order = dependency_order(files)?;
    let mut resolver = Resolver::default();

    for index in order {
        resolver.declare_file(&files[index])?;
    }
    resolver.resolve_fields()?;
    resolver.attach_map_entries()?;

    debug!(
        files = resolver.schema.files.len(),
        messages = resolver.schema.messages.len(),
        enums = resolver.schema.enums.len(),
        "resolved schema"
    );
    Ok(resolver.schema)
}

/// Orders file indices so that every file follows all of its imports.
fn dependency_order(files: &[FileDescriptorProto]) -> Result<Vec<usize>> {
    let mut index = HashMap::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        if index.insert(file.name.as_str(), i).is_some() {
            return Err(Error::DuplicateSymbol {
                name: file.name.clone(),
            });
        }
    }

    let mut sort = TopologicalSort {
        files,
        index,
        marks: vec![Mark::Unvisited; files.len()],
        path: Vec::new(),
        order: Vec::with_capacity(files.len()),
    };
    for i in 0..files.len() {
        sort.visit(i)?;
    }
    Ok(sort.order)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

struct TopologicalSort<'a> {
    files: &'a [FileDescriptorProto],
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    /// Files currently being visited, outermost first
    path: Vec<usize>,
    order: Vec<usize>,
}

impl TopologicalSort<'_> {
    fn visit(&mut self, i: usize) -> Result<()> {
        match self.marks[i] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = self.path.iter().position(|&p| p == i).unwrap_or(0);
                let mut cycle: Vec<String> = self.path[start..]
                    .iter()
                    .map(|&p| self.files[p].name.clone())
                    .collect();
                cycle.push(self.files[i].name.clone());
                return Err(Error::CyclicSchema { cycle });
            }
            Mark::Unvisited => {}
        }

        self.marks[i] = Mark::Visiting;
        self.path.push(i);

        let file = &self.files[i];
        for dependency in &file.dependency {
            let &j = self
                .index
                .get(dependency.as_str())
                .ok_or_else(|| Error::MissingDependency {
                    file: file.name.clone(),
                    dependency: dependency.clone(),
                })?;
            self.visit(j)?;
        }

        self.path.pop();
        self.marks[i] = Mark::Done;
        self.order.push(i);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Symbol {
    Message(MessageId),
    Enum(EnumId),
}

#[derive(Default)]
struct Resolver<'a> {
    schema: Schema,
    symbols: HashMap<String, Symbol>,
    /// Files whose symbols each file may reference, indexed by file
    visible: Vec<HashSet<FileId>>,
    /// Message declarations awaiting field resolution
    pending: Vec<(MessageId, &'a DescriptorProto)>,
}

impl<'a> Resolver<'a> {
    fn declare_file(&mut self, proto: &'a FileDescriptorProto) -> Result<()> {
        if proto.syntax != "proto3" {
            return Err(Error::UnsupportedSyntax {
                file: proto.name.clone(),
                syntax: proto.syntax.clone(),
            });
        }

        let id = FileId(self.schema.files.len());
        let dependencies: Vec<FileId> = proto
            .dependency
            .iter()
            .filter_map(|name| self.schema.file_by_name(name))
            .collect();

        let mut visible: HashSet<FileId> = HashSet::from([id]);
        for dependency in &dependencies {
            visible.extend(self.visible[dependency.0].iter().copied());
        }
        self.visible.push(visible);

        let digest = blake3::hash(&proto.encode_to_vec()).to_hex()[..DIGEST_LEN].to_string();
        self.schema.files.push(FileDescriptor {
            name: proto.name.clone(),
            package: proto.package.clone(),
            syntax: proto.syntax.clone(),
            dependencies,
            messages: Vec::new(),
            enums: Vec::new(),
            digest,
        });
        self.schema.files_by_name.insert(proto.name.clone(), id);

        for message in &proto.message_type {
            let message_id = self.declare_message(id, None, &proto.package, message)?;
            self.schema.files[id.0].messages.push(message_id);
        }
        for enumeration in &proto.enum_type {
            let enum_id = self.declare_enum(id, None, &proto.package, enumeration)?;
            self.schema.files[id.0].enums.push(enum_id);
        }

        debug!(file = %proto.name, package = %proto.package, "declared file");
        Ok(())
    }

    fn declare_message(
        &mut self,
        file: FileId,
        parent: Option<MessageId>,
        scope: &str,
        proto: &'a DescriptorProto,
    ) -> Result<MessageId> {
        let full_name = qualify(scope, &proto.name);
        let id = MessageId(self.schema.messages.len());
        self.register(&full_name, Symbol::Message(id))?;

        self.schema.messages.push(MessageDescriptor {
            name: proto.name.clone(),
            full_name: full_name.clone(),
            file,
            parent,
            fields: Vec::new(),
            oneofs: Vec::new(),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
            is_map_entry: proto.is_map_entry(),
        });
        self.pending.push((id, proto));

        for nested in &proto.nested_type {
            let nested_id = self.declare_message(file, Some(id), &full_name, nested)?;
            self.schema.messages[id.0].nested_messages.push(nested_id);
        }
        for enumeration in &proto.enum_type {
            let enum_id = self.declare_enum(file, Some(id), &full_name, enumeration)?;
            self.schema.messages[id.0].nested_enums.push(enum_id);
        }

        Ok(id)
    }

    fn declare_enum(
        &mut self,
        file: FileId,
        parent: Option<MessageId>,
        scope: &str,
        proto: &EnumDescriptorProto,
    ) -> Result<EnumId> {
        let full_name = qualify(scope, &proto.name);
        if proto.value.is_empty() {
            return Err(Error::EmptyEnum { name: full_name });
        }

        let id = EnumId(self.schema.enums.len());
        self.register(&full_name, Symbol::Enum(id))?;
        self.schema.enums.push(EnumDescriptor {
            name: proto.name.clone(),
            full_name,
            file,
            parent,
            values: proto
                .value
                .iter()
                .map(|value| EnumValue {
                    name: value.name.clone(),
                    number: value.number,
                })
                .collect(),
        });
        Ok(id)
    }

    fn register(&mut self, full_name: &str, symbol: Symbol) -> Result<()> {
        if self.symbols.insert(full_name.to_string(), symbol).is_some() {
            return Err(Error::DuplicateSymbol {
                name: full_name.to_string(),
            });
        }
        Ok(())
    }

    fn resolve_fields(&mut self) -> Result<()> {
        for (id, proto) in std::mem::take(&mut self.pending) {
            let (file, scope) = {
                let message = self.schema.message(id);
                (message.file, message.full_name.clone())
            };

            // proto3 `optional` fields live in a synthetic oneof of their own
            let synthetic: HashSet<i32> = proto
                .field
                .iter()
                .filter(|field| field.proto3_optional)
                .filter_map(|field| field.oneof_index)
                .collect();

            let mut slots = HashMap::new();
            let mut oneofs = Vec::new();
            for (index, decl) in proto.oneof_decl.iter().enumerate() {
                let index = index as i32;
                if !synthetic.contains(&index) {
                    slots.insert(index, oneofs.len());
                    oneofs.push(OneofDescriptor {
                        name: decl.name.clone(),
                        fields: Vec::new(),
                    });
                }
            }

            let mut numbers = HashSet::new();
            let mut fields = Vec::with_capacity(proto.field.len());
            for field_proto in &proto.field {
                let mut field = self.resolve_field(file, &scope, field_proto)?;
                if !numbers.insert(field.number) {
                    return Err(Error::DuplicateFieldNumber {
                        message: scope.clone(),
                        number: field.number,
                    });
                }

                if let (Some(index), false) = (field_proto.oneof_index, field_proto.proto3_optional) {
                    let &slot = slots.get(&index).ok_or_else(|| Error::InvalidOneofIndex {
                        field: qualify(&scope, &field_proto.name),
                        index,
                    })?;
                    oneofs[slot].fields.push(fields.len());
                    field.oneof = Some(slot);
                }

                fields.push(field);
            }

            let message = &mut self.schema.messages[id.0];
            message.fields = fields;
            message.oneofs = oneofs;
        }
        Ok(())
    }

    fn resolve_field(
        &self,
        file: FileId,
        scope: &str,
        proto: &FieldDescriptorProto,
    ) -> Result<FieldDescriptor> {
        let full_name = qualify(scope, &proto.name);

        if proto.number <= 0 || !is_valid_field_number(proto.number as u32) {
            return Err(Error::InvalidFieldNumber {
                field: full_name,
                number: proto.number,
            });
        }

        let cardinality = match Label::try_from(proto.label) {
            Ok(Label::Optional) | Err(0) => Cardinality::Singular,
            Ok(Label::Repeated) => Cardinality::Repeated,
            Ok(Label::Required) | Err(_) => {
                return Err(Error::UnsupportedLabel {
                    field: full_name,
                    label: proto.label,
                })
            }
        };

        let ty = match Type::try_from(proto.r#type) {
            Ok(Type::Message) => match self.lookup(file, scope, &proto.type_name, &full_name)? {
                Symbol::Message(id) => FieldType::Message(id),
                Symbol::Enum(_) => return Err(Error::unresolved(full_name, &proto.type_name)),
            },
            Ok(Type::Enum) => match self.lookup(file, scope, &proto.type_name, &full_name)? {
                Symbol::Enum(id) => FieldType::Enum(id),
                Symbol::Message(_) => return Err(Error::unresolved(full_name, &proto.type_name)),
            },
            // Unresolved descriptors may leave the type unset for named types
            Err(0) if !proto.type_name.is_empty() => {
                match self.lookup(file, scope, &proto.type_name, &full_name)? {
                    Symbol::Message(id) => FieldType::Message(id),
                    Symbol::Enum(id) => FieldType::Enum(id),
                }
            }
            Ok(ty) => match scalar_type(ty) {
                Some(scalar) => FieldType::Scalar(scalar),
                None => {
                    return Err(Error::UnsupportedFieldType {
                        field: full_name,
                        type_code: proto.r#type,
                    })
                }
            },
            Err(type_code) => {
                return Err(Error::UnsupportedFieldType {
                    field: full_name,
                    type_code,
                })
            }
        };

        let repeated = cardinality == Cardinality::Repeated;
        let explicit = proto.packed();
        if explicit == Some(true) && !(repeated && ty.is_packable()) {
            return Err(Error::InvalidPacked { field: full_name });
        }

        trace!(field = %full_name, number = proto.number, ?ty, ?cardinality, "resolved field");

        Ok(FieldDescriptor {
            name: proto.name.clone(),
            number: proto.number as u32,
            ty,
            cardinality,
            packed: repeated && ty.is_packable() && explicit.unwrap_or(true),
            map: None,
            oneof: None,
        })
    }

    /// Binds `type_name` as referenced from inside `scope`.
    ///
    /// Names with a leading dot are fully qualified. Others are tried in
    /// `scope`, then each enclosing scope out to the root; the first visible
    /// match wins.
    fn lookup(&self, file: FileId, scope: &str, type_name: &str, field: &str) -> Result<Symbol> {
        let visible = &self.visible[file.0];
        let find = |name: &str| {
            self.symbols
                .get(name)
                .filter(|symbol| visible.contains(&self.symbol_file(**symbol)))
                .copied()
        };

        if let Some(absolute) = type_name.strip_prefix('.') {
            return find(absolute).ok_or_else(|| Error::unresolved(field, type_name));
        }

        let mut scope = scope;
        loop {
            let candidate = qualify(scope, type_name);
            if let Some(symbol) = find(&candidate) {
                trace!(%type_name, resolved = %candidate, "resolved relative name");
                return Ok(symbol);
            }
            if scope.is_empty() {
                return Err(Error::unresolved(field, type_name));
            }
            scope = scope.rfind('.').map_or("", |dot| &scope[..dot]);
        }
    }

    fn symbol_file(&self, symbol: Symbol) -> FileId {
        match symbol {
            Symbol::Message(id) => self.schema.message(id).file,
            Symbol::Enum(id) => self.schema.enumeration(id).file,
        }
    }

    fn attach_map_entries(&mut self) -> Result<()> {
        for message_index in 0..self.schema.messages.len() {
            for field_index in 0..self.schema.messages[message_index].fields.len() {
                let field = &self.schema.messages[message_index].fields[field_index];
                let FieldType::Message(target) = field.ty else {
                    continue;
                };
                if !self.schema.message(target).is_map_entry {
                    continue;
                }

                let field_name = qualify(&self.schema.messages[message_index].full_name, &field.name);
                if !field.is_repeated() {
                    return Err(Error::invalid_map_entry(field_name, "map field must be repeated"));
                }
                let entry = self.map_entry(&field_name, target)?;
                self.schema.messages[message_index].fields[field_index].map = Some(entry);
            }
        }
        Ok(())
    }

    fn map_entry(&self, field: &str, entry: MessageId) -> Result<MapEntry> {
        let message = self.schema.message(entry);
        if message.fields.len() != 2 {
            return Err(Error::invalid_map_entry(field, "entry must have exactly two fields"));
        }

        let by_number = |number: u32| message.fields.iter().find(|f| f.number == number);
        let key = by_number(1).ok_or_else(|| Error::invalid_map_entry(field, "missing key field 1"))?;
        let value = by_number(2).ok_or_else(|| Error::invalid_map_entry(field, "missing value field 2"))?;

        if key.is_repeated() || value.is_repeated() {
            return Err(Error::invalid_map_entry(field, "key and value must be singular"));
        }
        let key = match key.ty {
            FieldType::Scalar(scalar) if scalar.is_valid_map_key() => scalar,
            _ => return Err(Error::invalid_map_entry(field, "key must be an integral, bool or string type")),
        };

        Ok(MapEntry {
            entry,
            key,
            value: value.ty,
        })
    }
}

/// Maps a descriptor type code to a scalar kind; `None` for composite types
fn scalar_type(ty: Type) -> Option<ScalarType> {
    Some(match ty {
        Type::Double => ScalarType::Double,
        Type::Float => ScalarType::Float,
        Type::Int64 => ScalarType::Int64,
        Type::Uint64 => ScalarType::Uint64,
        Type::Int32 => ScalarType::Int32,
        Type::Fixed64 => ScalarType::Fixed64,
        Type::Fixed32 => ScalarType::Fixed32,
        Type::Bool => ScalarType::Bool,
        Type::String => ScalarType::String,
        Type::Bytes => ScalarType::Bytes,
        Type::Uint32 => ScalarType::Uint32,
        Type::Sfixed32 => ScalarType::Sfixed32,
        Type::Sfixed64 => ScalarType::Sfixed64,
        Type::Sint32 => ScalarType::Sint32,
        Type::Sint64 => ScalarType::Sint64,
        Type::Group | Type::Message | Type::Enum => return None,
    })
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}
