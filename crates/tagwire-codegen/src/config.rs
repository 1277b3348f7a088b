//! Generator configuration and plugin parameter parsing.

use crate::error::{Error, Result};
use std::str::FromStr;

/// Configuration for code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Path generated code uses to reach the runtime crate (default: `::tagwire`)
    pub runtime_path: String,
    /// Store map fields as `BTreeMap` instead of `HashMap`
    pub btree_map: bool,
    /// Include the descriptor digest in each file header
    pub emit_digest: bool,
    /// Emit the `mod.rs` index listing every generated file
    pub emit_index: bool,
    /// Indentation string (default: 4 spaces)
    pub indent_str: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: "::tagwire".to_string(),
            btree_map: false,
            emit_digest: true,
            emit_index: true,
            indent_str: "    ".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime crate path
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Sets whether map fields use `BTreeMap`
    pub fn btree_map(mut self, enabled: bool) -> Self {
        self.btree_map = enabled;
        self
    }

    /// Sets whether headers carry the descriptor digest
    pub fn emit_digest(mut self, enabled: bool) -> Self {
        self.emit_digest = enabled;
        self
    }

    /// Sets whether the `mod.rs` index is generated
    pub fn emit_index(mut self, enabled: bool) -> Self {
        self.emit_index = enabled;
        self
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Parses a plugin parameter string.
    ///
    /// The format is a comma-separated list of `key=value` pairs and bare
    /// flags, e.g. `btree_map,runtime_path=crate::rt,indent=2`. Bare flags
    /// mean `true`. An empty string yields the defaults.
    pub fn parse(parameter: &str) -> Result<Self> {
        let mut config = Self::default();

        for item in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = match item.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (item, None),
            };

            match key {
                "runtime_path" => {
                    let path = value
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| Error::invalid_parameter(item, "expected a path"))?;
                    config.runtime_path = path.to_string();
                }
                "btree_map" => config.btree_map = parse_flag(item, value)?,
                "emit_digest" => config.emit_digest = parse_flag(item, value)?,
                "emit_index" => config.emit_index = parse_flag(item, value)?,
                "indent" => {
                    let width = value
                        .and_then(|v| usize::from_str(v).ok())
                        .filter(|width| (1..=16).contains(width))
                        .ok_or_else(|| {
                            Error::invalid_parameter(item, "expected a width between 1 and 16")
                        })?;
                    config.indent_str = " ".repeat(width);
                }
                _ => return Err(Error::invalid_parameter(item, "unknown option")),
            }
        }

        Ok(config)
    }
}

fn parse_flag(item: &str, value: Option<&str>) -> Result<bool> {
    match value {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(Error::invalid_parameter(item, "expected true or false")),
    }
}
