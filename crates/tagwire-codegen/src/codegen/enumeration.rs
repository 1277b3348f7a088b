//! Rust enums for protobuf enums.

use super::{names, FileGenerator};
use crate::descriptor::{EnumDescriptor, EnumId};
use crate::error::Result;
use std::collections::HashSet;
use std::fmt::Write as FmtWrite;
use tracing::trace;

/// One protobuf enum value as it appears in Rust
struct Variant<'a> {
    /// Value name in the `.proto` file
    proto_name: &'a str,
    ident: String,
    number: i32,
    /// For aliases, the identifier of the first variant with the same number
    alias_of: Option<String>,
}

/// Assigns identifiers to every value of an enum.
///
/// The first value for each number becomes a variant; later values with
/// the same number become aliases. Colliding identifiers get `_{number}`
/// appended until unique.
fn variants(enumeration: &EnumDescriptor) -> Vec<Variant<'_>> {
    let mut used = HashSet::new();
    let mut primary: Vec<(i32, String)> = Vec::new();
    let mut out = Vec::with_capacity(enumeration.values.len());

    for value in &enumeration.values {
        let mut ident = names::enum_variant(&enumeration.name, &value.name);
        while !used.insert(ident.clone()) {
            ident = format!("{ident}_{}", value.number);
        }

        let alias_of = primary
            .iter()
            .find(|(number, _)| *number == value.number)
            .map(|(_, ident)| ident.clone());
        if alias_of.is_none() {
            primary.push((value.number, ident.clone()));
        }

        out.push(Variant {
            proto_name: &value.name,
            ident,
            number: value.number,
            alias_of,
        });
    }

    out
}

impl<W: FmtWrite> FileGenerator<'_, W> {
    pub(super) fn write_enum(&mut self, id: EnumId) -> Result<()> {
        let schema = self.schema;
        let enumeration = schema.enumeration(id);
        trace!(enumeration = %enumeration.full_name, "generating enum");

        let ident = names::type_ident(&enumeration.name);
        let variants = variants(enumeration);
        let primaries: Vec<&Variant<'_>> = variants.iter().filter(|v| v.alias_of.is_none()).collect();

        self.out.begin_item()?;
        self.out.writeln("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]")?;
        self.out.writeln("#[repr(i32)]")?;
        self.out.open(format_args!("pub enum {ident} {{"))?;
        for variant in &primaries {
            emit!(self, "{} = {},", variant.ident, variant.number)?;
        }
        self.out.close("}")?;

        // Names
        self.out.begin_item()?;
        self.out.open(format_args!("impl {ident} {{"))?;
        for variant in &variants {
            if let Some(target) = &variant.alias_of {
                self.out.writeln("#[allow(non_upper_case_globals)]")?;
                emit!(self, "pub const {}: Self = Self::{target};", variant.ident)?;
            }
        }
        if variants.len() != primaries.len() {
            self.out.blank()?;
        }
        self.out.writeln("/// Name of the value as written in the `.proto` definition.")?;
        self.out.open(format_args!("pub fn as_str_name(&self) -> &'static str {{"))?;
        self.out.open(format_args!("match self {{"))?;
        for variant in &primaries {
            emit!(self, "Self::{} => \"{}\",", variant.ident, variant.proto_name)?;
        }
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.blank()?;
        self.out.writeln("/// Looks up a value by its `.proto` name.")?;
        self.out.open(format_args!(
            "pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {{"
        ))?;
        self.out.open(format_args!("match value {{"))?;
        for variant in &variants {
            let target = variant.alias_of.as_deref().unwrap_or(&variant.ident);
            emit!(
                self,
                "\"{}\" => ::core::option::Option::Some(Self::{target}),",
                variant.proto_name
            )?;
        }
        self.out.writeln("_ => ::core::option::Option::None,")?;
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.close("}")?;

        // Default
        let default = enumeration
            .default_value()
            .and_then(|value| primaries.iter().find(|v| v.number == value.number))
            .or_else(|| primaries.first());
        if let Some(default) = default {
            self.out.begin_item()?;
            self.out.open(format_args!("impl ::core::default::Default for {ident} {{"))?;
            self.out.open(format_args!("fn default() -> Self {{"))?;
            emit!(self, "Self::{}", default.ident)?;
            self.out.close("}")?;
            self.out.close("}")?;
        }

        // Conversions
        self.out.begin_item()?;
        self.out.open(format_args!("impl ::core::convert::TryFrom<i32> for {ident} {{"))?;
        self.out.writeln("type Error = i32;")?;
        self.out.blank()?;
        self.out.open(format_args!(
            "fn try_from(value: i32) -> ::core::result::Result<Self, i32> {{"
        ))?;
        self.out.open(format_args!("match value {{"))?;
        for variant in &primaries {
            emit!(
                self,
                "{} => ::core::result::Result::Ok(Self::{}),",
                variant.number,
                variant.ident
            )?;
        }
        self.out.writeln("other => ::core::result::Result::Err(other),")?;
        self.out.close("}")?;
        self.out.close("}")?;
        self.out.close("}")?;

        self.out.begin_item()?;
        self.out.open(format_args!("impl ::core::convert::From<{ident}> for i32 {{"))?;
        self.out.open(format_args!("fn from(value: {ident}) -> i32 {{"))?;
        self.out.writeln("value as i32")?;
        self.out.close("}")?;
        self.out.close("}")?;

        Ok(())
    }
}
