//! # tagwire
//!
//! Runtime support for Protocol Buffers messages generated by
//! `protoc-gen-tagwire`.
//!
//! This crate provides:
//! - Wire format primitives: varints, zigzag, tags, fixed-width and
//!   length-delimited payloads
//! - Per-field-kind encode/decode routines that generated code calls
//! - The [`Message`] trait every generated type implements
//!
//! ## Architecture
//!
//! - [`wire`]: byte-level primitives and the [`WireReader`] cursor
//! - [`encoding`]: one module per field kind (`int32`, `string`, `message`, `map`, ...)
//! - [`message`]: the [`Message`] trait
//! - [`error`]: [`DecodeError`] and [`EncodeError`]
//!
//! ## Example
//!
//! A hand-written message shaped like generated output:
//!
//! ```
//! use tagwire::bytes::BufMut;
//! use tagwire::{DecodeContext, Message, WireReader, WireType};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Test1 {
//!     a: i32,
//! }
//!
//! impl Message for Test1 {
//!     fn encode_raw<B: BufMut>(&self, buf: &mut B) {
//!         if self.a != 0 {
//!             tagwire::encoding::int32::encode(1, &self.a, buf);
//!         }
//!     }
//!
//!     fn merge_field(
//!         &mut self,
//!         number: u32,
//!         wire_type: WireType,
//!         reader: &mut WireReader<'_>,
//!         ctx: DecodeContext,
//!     ) -> tagwire::Result<()> {
//!         match number {
//!             1 => tagwire::encoding::int32::merge(wire_type, &mut self.a, reader, ctx),
//!             _ => tagwire::wire::skip_field(number, wire_type, reader),
//!         }
//!     }
//!
//!     fn encoded_len(&self) -> usize {
//!         if self.a != 0 { tagwire::encoding::int32::encoded_len(1, &self.a) } else { 0 }
//!     }
//! }
//!
//! let bytes = Test1 { a: 150 }.encode_to_vec();
//! assert_eq!(bytes, [0x08, 0x96, 0x01]);
//! assert_eq!(Test1::decode(&bytes)?, Test1 { a: 150 });
//! # Ok::<(), tagwire::DecodeError>(())
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, unreachable_pub)]

pub mod encoding;
pub mod error;
pub mod message;
pub mod wire;

// Generated code reaches `BufMut` through this re-export
pub use bytes;

// Re-export primary types for convenience
pub use error::{DecodeError, EncodeError, Result};
pub use message::Message;
pub use wire::{DecodeContext, WireReader, WireType, MAX_FIELD_NUMBER};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
