//! # tagwire-codegen
//!
//! Descriptor resolution and Rust code generation behind
//! `protoc-gen-tagwire`.
//!
//! This crate provides the core functionality for:
//! - Decoding the `protoc` plugin protocol and descriptor sets
//! - Resolving raw descriptors into a typed, index-linked [`Schema`]
//! - Generating Rust source that implements [`tagwire::Message`]
//!
//! ## Architecture
//!
//! - [`protocol`]: the plugin request/response and descriptor messages
//! - [`resolver`]: raw descriptors to [`Schema`]
//! - [`descriptor`]: the resolved schema arena
//! - [`codegen`]: per-file Rust source generation
//! - [`plugin`]: the request/response driver
//! - [`output`]: writing generated files to disk
//! - [`config`]: generator options and plugin parameter parsing
//! - [`error`]: error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use tagwire::Message;
//! use tagwire_codegen::protocol::FileDescriptorSet;
//! use tagwire_codegen::{generate_files, GeneratorConfig};
//! use std::fs;
//!
//! // protoc --include_imports --descriptor_set_out=api.bin api.proto
//! let set = FileDescriptorSet::decode(&fs::read("api.bin")?)?;
//! let files = generate_files(&set.file, &["api.proto".to_string()], &GeneratorConfig::default())?;
//!
//! for file in files {
//!     println!("// {}\n{}", file.name, file.content);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, unreachable_pub)]

pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod output;
pub mod plugin;
pub mod protocol;
pub mod resolver;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience
pub use codegen::{generate_file, generate_index, GeneratedFile};
pub use config::GeneratorConfig;
pub use descriptor::Schema;
pub use error::{Error, Result};
pub use output::write_files;
pub use plugin::{generate, generate_files, Plugin, PluginState};
pub use resolver::resolve;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
