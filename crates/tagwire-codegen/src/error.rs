//! Error types for descriptor resolution and code generation.
//!
//! Every variant is fatal for the invocation: the plugin driver turns it into
//! the response's `error` string and emits no files.

use std::path::PathBuf;
use tagwire::DecodeError;
use thiserror::Error;

/// Result type alias for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while resolving a schema or generating code from it
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request or descriptor set was not valid wire format
    #[error("failed to decode request: {0}")]
    Decode(#[from] DecodeError),

    /// A file imports a file that was not supplied
    #[error("'{file}' imports '{dependency}', which is not part of the request")]
    MissingDependency {
        /// The importing file
        file: String,
        /// The missing import
        dependency: String,
    },

    /// Files import each other in a cycle
    #[error("import cycle: {}", cycle.join(" -> "))]
    CyclicSchema {
        /// File names along the cycle, first and last equal
        cycle: Vec<String>,
    },

    /// Two files, or two symbols, share a fully-qualified name
    #[error("'{name}' is defined more than once")]
    DuplicateSymbol {
        /// The conflicting name
        name: String,
    },

    /// A field names a type that is not visible from its scope
    #[error("field '{field}' refers to unknown type '{type_name}'")]
    UnresolvedTypeReference {
        /// Fully-qualified field name
        field: String,
        /// The type name as written in the descriptor
        type_name: String,
    },

    /// Field number outside 1..=2^29-1 or in the reserved 19000..=19999 range
    #[error("field '{field}' has invalid number {number}")]
    InvalidFieldNumber {
        /// Fully-qualified field name
        field: String,
        /// The offending number
        number: i32,
    },

    /// Two fields of one message share a number
    #[error("message '{message}' uses field number {number} more than once")]
    DuplicateFieldNumber {
        /// Fully-qualified message name
        message: String,
        /// The duplicated number
        number: u32,
    },

    /// `packed` set on a field that cannot be packed
    #[error("field '{field}' cannot be packed")]
    InvalidPacked {
        /// Fully-qualified field name
        field: String,
    },

    /// A map field's synthesized entry message is malformed
    #[error("invalid map entry for field '{field}': {reason}")]
    InvalidMapEntry {
        /// Fully-qualified field name
        field: String,
        /// What is wrong with the entry
        reason: String,
    },

    /// A oneof index pointing past the message's oneof declarations
    #[error("field '{field}' refers to missing oneof {index}")]
    InvalidOneofIndex {
        /// Fully-qualified field name
        field: String,
        /// The out-of-range index
        index: i32,
    },

    /// An enum without any values
    #[error("enum '{name}' has no values")]
    EmptyEnum {
        /// Fully-qualified enum name
        name: String,
    },

    /// Only proto3 files are supported
    #[error("'{file}' uses unsupported syntax '{syntax}'")]
    UnsupportedSyntax {
        /// The file
        file: String,
        /// The declared syntax (empty means proto2)
        syntax: String,
    },

    /// `required` or an unknown label
    #[error("field '{field}' has unsupported label {label}")]
    UnsupportedLabel {
        /// Fully-qualified field name
        field: String,
        /// Raw label value
        label: i32,
    },

    /// Groups or an unknown field type code
    #[error("field '{field}' has unsupported type {type_code}")]
    UnsupportedFieldType {
        /// Fully-qualified field name
        field: String,
        /// Raw type value
        type_code: i32,
    },

    /// A `file_to_generate` entry with no matching `proto_file`
    #[error("file to generate '{name}' was not supplied")]
    UnknownFileToGenerate {
        /// The requested file name
        name: String,
    },

    /// Unrecognized or malformed plugin parameter
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter as written
        parameter: String,
        /// Why it was rejected
        reason: String,
    },

    /// Two input files would be written to the same output file
    #[error("more than one file maps to output '{name}'")]
    DuplicateOutput {
        /// The contested output file name
        name: String,
    },

    /// Reading the request or writing the response failed
    #[error("plugin I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write a generated file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path traversal attempt detected (security error)
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The suspicious path
        path: PathBuf,
    },

    /// Formatting into the output buffer failed
    #[error("failed to format generated code")]
    Format(#[from] std::fmt::Error),
}

impl Error {
    /// Creates a new unresolved type reference error
    pub fn unresolved(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnresolvedTypeReference {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new map entry error
    pub fn invalid_map_entry(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMapEntry {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }
}
