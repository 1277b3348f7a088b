//! Rust source generation from a resolved [`Schema`].
//!
//! Every `.proto` file becomes one Rust source file named after the file
//! (`foo/bar.proto` becomes `foo_bar.rs`). Inside it:
//!
//! - each message becomes a `struct` with a `tagwire::Message` impl
//! - each enum becomes a `#[repr(i32)]` Rust enum
//! - nested types and oneofs live in a `snake_case` module named after the
//!   enclosing message
//!
//! Generated files are expected to be siblings under one parent module,
//! which is what the `mod.rs` index produced by [`generate_index`] declares.
//! References to types from an imported file go through that parent.

macro_rules! emit {
    ($gen:expr, $($arg:tt)*) => {
        $gen.out.line(format_args!($($arg)*))
    };
}

mod enumeration;
mod message;
pub mod names;
mod writer;

use crate::config::GeneratorConfig;
use crate::descriptor::{EnumId, FieldType, FileId, MessageId, ScalarType, Schema};
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::iter;
use tracing::debug;
use writer::CodeWriter;

/// Name announced in generated file headers
pub const GENERATOR_NAME: &str = "protoc-gen-tagwire";

/// File name of the module index
pub const INDEX_FILE: &str = "mod.rs";

/// One output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory
    pub name: String,
    pub content: String,
}

/// Output file name for a `.proto` file
pub fn output_file_name(proto_name: &str) -> String {
    format!("{}.rs", names::file_module(proto_name))
}

/// Generates the Rust source for one file of `schema`.
pub fn generate_file(
    schema: &Schema,
    file: FileId,
    config: &GeneratorConfig,
) -> Result<GeneratedFile> {
    let name = &schema.file(file).name;
    let mut content = String::new();

    FileGenerator {
        schema,
        file,
        config,
        out: CodeWriter::new(&mut content, &config.indent_str),
        scope: Vec::new(),
    }
    .write_file()?;

    debug!(file = %name, bytes = content.len(), "generated file");
    Ok(GeneratedFile {
        name: output_file_name(name),
        content,
    })
}

/// Generates the `mod.rs` index declaring one module per file.
pub fn generate_index(
    schema: &Schema,
    files: &[FileId],
    config: &GeneratorConfig,
) -> Result<GeneratedFile> {
    let mut modules: Vec<String> = files
        .iter()
        .map(|&id| names::file_module(&schema.file(id).name))
        .collect();
    modules.sort();
    modules.dedup();

    let mut content = String::new();
    let mut out = CodeWriter::new(&mut content, &config.indent_str);
    out.line(format_args!("// This file is @generated by {GENERATOR_NAME}. Do not edit."))?;
    out.blank()?;
    for module in &modules {
        out.line(format_args!("pub mod {module};"))?;
    }

    Ok(GeneratedFile {
        name: INDEX_FILE.to_string(),
        content,
    })
}

/// Rust type of a singular scalar value
fn scalar_rust_type(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::Double => "f64",
        ScalarType::Float => "f32",
        ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => "i32",
        ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => "i64",
        ScalarType::Uint32 | ScalarType::Fixed32 => "u32",
        ScalarType::Uint64 | ScalarType::Fixed64 => "u64",
        ScalarType::Bool => "bool",
        ScalarType::String => "::std::string::String",
        ScalarType::Bytes => "::std::vec::Vec<u8>",
    }
}

/// Writes the items of one file.
struct FileGenerator<'a, W: FmtWrite> {
    schema: &'a Schema,
    file: FileId,
    config: &'a GeneratorConfig,
    out: CodeWriter<'a, W>,
    /// Module path from the file root to where code is being written
    scope: Vec<String>,
}

impl<W: FmtWrite> FileGenerator<'_, W> {
    fn write_file(&mut self) -> Result<()> {
        let schema = self.schema;
        let file = schema.file(self.file);

        emit!(self, "// This file is @generated by {GENERATOR_NAME}. Do not edit.")?;
        emit!(self, "// source: {}", file.name)?;
        if self.config.emit_digest {
            emit!(self, "// descriptor digest: {}", file.digest)?;
        }
        self.out.blank()?;

        for &id in &file.messages {
            self.write_message(id)?;
        }
        for &id in &file.enums {
            self.write_enum(id)?;
        }
        Ok(())
    }

    fn runtime(&self) -> &str {
        &self.config.runtime_path
    }

    /// Path to a type declared inside `parent` (or at the root of `file`),
    /// relative to the current scope
    fn type_path(&self, file: FileId, parent: Option<MessageId>, name: &str) -> String {
        let schema = self.schema;
        let target: Vec<String> = schema
            .message_ancestors(parent)
            .into_iter()
            .map(|id| names::module_ident(&schema.message(id).name))
            .collect();

        let mut segments: Vec<String> = Vec::new();
        if file == self.file {
            let common = self
                .scope
                .iter()
                .zip(&target)
                .take_while(|(a, b)| a == b)
                .count();
            segments.extend(iter::repeat("super".to_string()).take(self.scope.len() - common));
            segments.extend(target[common..].iter().cloned());
        } else {
            segments.extend(iter::repeat("super".to_string()).take(self.scope.len() + 1));
            segments.push(names::file_module(&schema.file(file).name));
            segments.extend(target);
        }
        segments.push(names::type_ident(name));
        segments.join("::")
    }

    fn message_path(&self, id: MessageId) -> String {
        let message = self.schema.message(id);
        self.type_path(message.file, message.parent, &message.name)
    }

    fn enum_path(&self, id: EnumId) -> String {
        let enumeration = self.schema.enumeration(id);
        self.type_path(enumeration.file, enumeration.parent, &enumeration.name)
    }

    /// Rust type holding one value of `ty`; enums are stored as `i32`
    fn value_type(&self, ty: FieldType) -> String {
        match ty {
            FieldType::Scalar(scalar) => scalar_rust_type(scalar).to_string(),
            FieldType::Enum(_) => "i32".to_string(),
            FieldType::Message(id) => self.message_path(id),
        }
    }

    /// `tagwire::encoding` module handling `ty`
    fn encoding_module(&self, ty: FieldType) -> String {
        let module = match ty {
            FieldType::Scalar(scalar) => scalar.proto_name(),
            FieldType::Enum(_) => "enumeration",
            FieldType::Message(_) => "message",
        };
        format!("{}::encoding::{module}", self.runtime())
    }
}

#[cfg(test)]
mod tests;
