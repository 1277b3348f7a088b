//! Message structs, their `Message` impls and oneof enums.

use super::{names, FileGenerator};
use crate::descriptor::{FieldDescriptor, FieldType, MapEntry, MessageDescriptor, MessageId, ScalarType};
use crate::error::Result;
use std::collections::HashSet;
use std::fmt::Write as FmtWrite;
use tracing::trace;

/// Which of the two size-dependent passes is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Encode,
    EncodedLen,
}

impl<W: FmtWrite> FileGenerator<'_, W> {
    pub(super) fn write_message(&mut self, id: MessageId) -> Result<()> {
        let schema = self.schema;
        let message = schema.message(id);
        if message.is_map_entry {
            return Ok(());
        }
        trace!(message = %message.full_name, "generating message");

        let ident = names::type_ident(&message.name);
        self.write_struct(id, message, &ident)?;
        self.write_accessors(message, &ident)?;
        self.write_message_impl(id, message, &ident)?;
        self.write_nested_module(id, message)
    }

    fn write_struct(&mut self, id: MessageId, message: &MessageDescriptor, ident: &str) -> Result<()> {
        self.out.begin_item()?;
        self.out.writeln("#[derive(Clone, PartialEq, Debug, Default)]")?;
        self.out.open(format_args!("pub struct {ident} {{"))?;

        for field in message.fields.iter().filter(|field| field.oneof.is_none()) {
            let ty = self.field_type(id, field);
            emit!(self, "pub {}: {ty},", names::field_ident(&field.name))?;
        }
        let module = names::module_ident(&message.name);
        for oneof in message.oneofs.iter().filter(|oneof| !oneof.fields.is_empty()) {
            emit!(
                self,
                "pub {}: ::core::option::Option<{module}::{}>,",
                names::field_ident(&oneof.name),
                names::type_ident(&oneof.name)
            )?;
        }

        self.out.close("}")?;
        Ok(())
    }

    /// Typed getters for singular enum fields, which are stored as `i32`
    fn write_accessors(&mut self, message: &MessageDescriptor, ident: &str) -> Result<()> {
        let schema = self.schema;
        let enum_fields: Vec<_> = message
            .fields
            .iter()
            .filter(|field| field.oneof.is_none() && !field.is_repeated())
            .filter_map(|field| match field.ty {
                FieldType::Enum(id) => Some((field, id)),
                _ => None,
            })
            .collect();
        if enum_fields.is_empty() {
            return Ok(());
        }

        self.out.begin_item()?;
        self.out.open(format_args!("impl {ident} {{"))?;
        for (field, enum_id) in enum_fields {
            let path = self.enum_path(enum_id);
            let field_ident = names::field_ident(&field.name);
            self.out.begin_item()?;
            emit!(
                self,
                "/// Returns `{}` as `{}`, falling back to the default for unknown values.",
                field.name,
                names::type_ident(&schema.enumeration(enum_id).name)
            )?;
            self.out.open(format_args!("pub fn {field_ident}(&self) -> {path} {{"))?;
            emit!(self, "{path}::try_from(self.{field_ident}).unwrap_or_default()")?;
            self.out.close("}")?;
        }
        self.out.close("}")?;
        Ok(())
    }

    fn write_message_impl(&mut self, id: MessageId, message: &MessageDescriptor, ident: &str) -> Result<()> {
        let rt = self.runtime().to_string();
        let fields = message.fields_by_number();

        self.out.begin_item()?;
        self.out.open(format_args!("impl {rt}::Message for {ident} {{"))?;

        // encode_raw
        self.out.begin_item()?;
        if fields.is_empty() {
            emit!(self, "fn encode_raw<B: {rt}::bytes::BufMut>(&self, _buf: &mut B) {{}}")?;
        } else {
            self.out.open(format_args!("fn encode_raw<B: {rt}::bytes::BufMut>(&self, buf: &mut B) {{"))?;
            for field in &fields {
                self.write_field_size_pass(id, message, field, Pass::Encode)?;
            }
            self.out.close("}")?;
        }

        // merge_field
        self.out.begin_item()?;
        self.out.open(format_args!("fn merge_field("))?;
        self.out.writeln("&mut self,")?;
        self.out.writeln("number: u32,")?;
        emit!(self, "wire_type: {rt}::WireType,")?;
        emit!(self, "reader: &mut {rt}::WireReader<'_>,")?;
        let ctx = if fields.is_empty() { "_ctx" } else { "ctx" };
        emit!(self, "{ctx}: {rt}::DecodeContext,")?;
        self.out.dedent();
        emit!(self, ") -> {rt}::Result<()> {{")?;
        self.out.indent();
        self.out.writeln("match number {")?;
        self.out.indent();
        for field in &fields {
            self.write_merge_arm(id, message, field)?;
        }
        emit!(self, "_ => {rt}::wire::skip_field(number, wire_type, reader),")?;
        self.out.close("}")?;
        self.out.close("}")?;

        // encoded_len
        self.out.begin_item()?;
        self.out.open(format_args!("fn encoded_len(&self) -> usize {{"))?;
        if fields.is_empty() {
            self.out.writeln("0")?;
        } else {
            self.out.writeln("let mut len = 0;")?;
            for field in &fields {
                self.write_field_size_pass(id, message, field, Pass::EncodedLen)?;
            }
            self.out.writeln("len")?;
        }
        self.out.close("}")?;

        self.out.close("}")?;
        Ok(())
    }

    /// Writes one field's part of `encode_raw` or `encoded_len`
    fn write_field_size_pass(
        &mut self,
        owner: MessageId,
        message: &MessageDescriptor,
        field: &FieldDescriptor,
        pass: Pass,
    ) -> Result<()> {
        let rt = self.runtime().to_string();
        let module = self.encoding_module(field.ty);
        let number = field.number;
        let ident = names::field_ident(&field.name);
        let (prefix, buf) = match pass {
            Pass::Encode => ("", ", buf"),
            Pass::EncodedLen => ("len += ", ""),
        };
        let suffix = match pass {
            Pass::Encode => "encode",
            Pass::EncodedLen => "encoded_len",
        };

        if let Some(entry) = field.map {
            let (key, value) = self.map_modules(entry);
            emit!(self, "{prefix}{rt}::encoding::map::{suffix}(")?;
            self.out.indent();
            if pass == Pass::Encode {
                emit!(self, "{key}::encode,")?;
            }
            emit!(self, "{key}::encoded_len,")?;
            if pass == Pass::Encode {
                emit!(self, "{value}::encode,")?;
            }
            emit!(self, "{value}::encoded_len,")?;
            emit!(self, "{number},")?;
            emit!(self, "&self.{ident},")?;
            if pass == Pass::Encode {
                self.out.writeln("buf,")?;
            }
            self.out.dedent();
            self.out.writeln(");")?;
            return Ok(());
        }

        if field.is_repeated() {
            let form = if field.packed { "packed" } else { "repeated" };
            let function = match pass {
                Pass::Encode => format!("encode_{form}"),
                Pass::EncodedLen => format!("encoded_len_{form}"),
            };
            emit!(self, "{prefix}{module}::{function}({number}, &self.{ident}{buf});")?;
            return Ok(());
        }

        let value = if self.is_boxed(owner, field) { "&**value" } else { "value" };

        if let Some(oneof) = field.oneof {
            let oneof_ident = names::field_ident(&message.oneofs[oneof].name);
            let variant = format!("{}::{}", self.oneof_enum_path(message, oneof), variant_name(message, oneof, field));
            self.out.open(format_args!(
                "if let ::core::option::Option::Some({variant}(value)) = &self.{oneof_ident} {{"
            ))?;
            emit!(self, "{prefix}{module}::{suffix}({number}, {value}{buf});")?;
            self.out.close("}")?;
            return Ok(());
        }

        match field.ty {
            FieldType::Message(_) => {
                self.out.open(format_args!(
                    "if let ::core::option::Option::Some(value) = &self.{ident} {{"
                ))?;
                emit!(self, "{prefix}{module}::{suffix}({number}, {value}{buf});")?;
            }
            FieldType::Scalar(_) | FieldType::Enum(_) => {
                let check = default_check(field.ty, &format!("self.{ident}"));
                self.out.open(format_args!("if {check} {{"))?;
                emit!(self, "{prefix}{module}::{suffix}({number}, &self.{ident}{buf});")?;
            }
        }
        self.out.close("}")?;
        Ok(())
    }

    fn write_merge_arm(&mut self, owner: MessageId, message: &MessageDescriptor, field: &FieldDescriptor) -> Result<()> {
        let rt = self.runtime().to_string();
        let module = self.encoding_module(field.ty);
        let number = field.number;
        let ident = names::field_ident(&field.name);

        if let Some(entry) = field.map {
            let (key, value) = self.map_modules(entry);
            emit!(self, "{number} => {rt}::encoding::map::merge(")?;
            self.out.indent();
            emit!(self, "{key}::merge,")?;
            emit!(self, "{value}::merge,")?;
            self.out.writeln("wire_type,")?;
            emit!(self, "&mut self.{ident},")?;
            self.out.writeln("reader,")?;
            self.out.writeln("ctx,")?;
            self.out.dedent();
            self.out.writeln("),")?;
            return Ok(());
        }

        if field.is_repeated() {
            emit!(self, "{number} => {module}::merge_repeated(wire_type, &mut self.{ident}, reader, ctx),")?;
            return Ok(());
        }

        let boxed = self.is_boxed(owner, field);

        if let Some(oneof) = field.oneof {
            let oneof_ident = names::field_ident(&message.oneofs[oneof].name);
            let variant = format!("{}::{}", self.oneof_enum_path(message, oneof), variant_name(message, oneof, field));
            let (value_type, target) = if boxed {
                (format!("::std::boxed::Box<{}>", self.value_type(field.ty)), "&mut *value")
            } else {
                (self.value_type(field.ty), "&mut value")
            };

            self.out.open(format_args!("{number} => {{"))?;
            emit!(self, "let mut value: {value_type} = ::core::default::Default::default();")?;
            emit!(self, "{module}::merge(wire_type, {target}, reader, ctx)?;")?;
            emit!(self, "self.{oneof_ident} = ::core::option::Option::Some({variant}(value));")?;
            self.out.writeln("::core::result::Result::Ok(())")?;
            self.out.dedent();
            self.out.writeln("}")?;
            return Ok(());
        }

        match field.ty {
            FieldType::Message(_) => {
                let target = if boxed {
                    format!("&mut **self.{ident}.get_or_insert_with(::core::default::Default::default)")
                } else {
                    format!("self.{ident}.get_or_insert_with(::core::default::Default::default)")
                };
                emit!(self, "{number} => {module}::merge(")?;
                self.out.indent();
                self.out.writeln("wire_type,")?;
                emit!(self, "{target},")?;
                self.out.writeln("reader,")?;
                self.out.writeln("ctx,")?;
                self.out.dedent();
                self.out.writeln("),")?;
            }
            FieldType::Scalar(_) | FieldType::Enum(_) => {
                emit!(self, "{number} => {module}::merge(wire_type, &mut self.{ident}, reader, ctx),")?;
            }
        }
        Ok(())
    }

    fn write_nested_module(&mut self, id: MessageId, message: &MessageDescriptor) -> Result<()> {
        let schema = self.schema;
        let nested_messages: Vec<MessageId> = message
            .nested_messages
            .iter()
            .copied()
            .filter(|&nested| !schema.message(nested).is_map_entry)
            .collect();
        let has_oneofs = message.oneofs.iter().any(|oneof| !oneof.fields.is_empty());
        if nested_messages.is_empty() && message.nested_enums.is_empty() && !has_oneofs {
            return Ok(());
        }

        let module = names::module_ident(&message.name);
        self.out.begin_item()?;
        emit!(self, "/// Nested message and enum types in `{}`.", names::type_ident(&message.name))?;
        self.out.open(format_args!("pub mod {module} {{"))?;
        self.scope.push(module);

        for nested in nested_messages {
            self.write_message(nested)?;
        }
        for &nested in &message.nested_enums {
            self.write_enum(nested)?;
        }
        for (index, oneof) in message.oneofs.iter().enumerate() {
            if !oneof.fields.is_empty() {
                self.write_oneof_enum(id, message, index)?;
            }
        }

        self.scope.pop();
        self.out.close("}")?;
        Ok(())
    }

    /// Writes the enum for one oneof; the current scope is the message's
    /// nested module
    fn write_oneof_enum(&mut self, owner: MessageId, message: &MessageDescriptor, oneof: usize) -> Result<()> {
        let decl = &message.oneofs[oneof];
        self.out.begin_item()?;
        self.out.writeln("#[derive(Clone, PartialEq, Debug)]")?;
        self.out.open(format_args!("pub enum {} {{", names::type_ident(&decl.name)))?;

        for (index, variant) in oneof_variants(message, oneof) {
            let field = &message.fields[index];
            let ty = if self.is_boxed(owner, field) {
                format!("::std::boxed::Box<{}>", self.value_type(field.ty))
            } else {
                self.value_type(field.ty)
            };
            emit!(self, "{variant}({ty}),")?;
        }

        self.out.close("}")?;
        Ok(())
    }

    /// Rust type of a struct field
    fn field_type(&self, owner: MessageId, field: &FieldDescriptor) -> String {
        if let Some(entry) = field.map {
            let map = if self.config.btree_map {
                "::std::collections::BTreeMap"
            } else {
                "::std::collections::HashMap"
            };
            let key = super::scalar_rust_type(entry.key);
            return format!("{map}<{key}, {}>", self.value_type(entry.value));
        }

        let value = self.value_type(field.ty);
        if field.is_repeated() {
            return format!("::std::vec::Vec<{value}>");
        }
        match field.ty {
            FieldType::Message(_) if self.is_boxed(owner, field) => {
                format!("::core::option::Option<::std::boxed::Box<{value}>>")
            }
            FieldType::Message(_) => format!("::core::option::Option<{value}>"),
            FieldType::Scalar(_) | FieldType::Enum(_) => value,
        }
    }

    /// Singular message fields that would make the struct infinitely sized
    fn is_boxed(&self, owner: MessageId, field: &FieldDescriptor) -> bool {
        match field.ty {
            FieldType::Message(target) if !field.is_repeated() => self.schema.is_recursive(owner, target),
            _ => false,
        }
    }

    /// Path to a oneof's enum from the scope the message itself lives in
    fn oneof_enum_path(&self, message: &MessageDescriptor, oneof: usize) -> String {
        format!(
            "{}::{}",
            names::module_ident(&message.name),
            names::type_ident(&message.oneofs[oneof].name)
        )
    }

    /// Encoding modules for a map's key and value
    fn map_modules(&self, entry: MapEntry) -> (String, String) {
        (
            self.encoding_module(FieldType::Scalar(entry.key)),
            self.encoding_module(entry.value),
        )
    }
}

/// Variant names of a oneof's members, paired with their field indices.
///
/// Names that collide after case conversion get the field number appended.
fn oneof_variants(message: &MessageDescriptor, oneof: usize) -> Vec<(usize, String)> {
    let mut used = HashSet::new();
    message.oneofs[oneof]
        .fields
        .iter()
        .map(|&index| {
            let field = &message.fields[index];
            let mut name = names::type_ident(&field.name);
            if !used.insert(name.clone()) {
                name = format!("{name}{}", field.number);
                used.insert(name.clone());
            }
            (index, name)
        })
        .collect()
}

fn variant_name(message: &MessageDescriptor, oneof: usize, field: &FieldDescriptor) -> String {
    oneof_variants(message, oneof)
        .into_iter()
        .find(|(index, _)| message.fields[*index].number == field.number)
        .map(|(_, name)| name)
        .unwrap_or_else(|| names::type_ident(&field.name))
}

/// Condition under which a singular scalar differs from its default
fn default_check(ty: FieldType, access: &str) -> String {
    match ty {
        FieldType::Scalar(ScalarType::Double | ScalarType::Float) => format!("{access}.to_bits() != 0"),
        FieldType::Scalar(ScalarType::String | ScalarType::Bytes) => format!("!{access}.is_empty()"),
        FieldType::Scalar(ScalarType::Bool) => access.to_string(),
        _ => format!("{access} != 0"),
    }
}
