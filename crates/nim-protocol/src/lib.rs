//! nim-protocol
//!
//! Wire-level encoding/decoding for networked Nim.
//!
//! This crate is responsible for turning logical game messages
//! (`nim_core::Request` / `Notification`) into bytes and back again.
//!
//! - [`wire_types`]   : opcodes and field limits
//! - [`binary_codec`] : encode / incremental decode

pub mod binary_codec;
pub mod error;
pub mod wire_types;

pub use binary_codec::{decode_notification, decode_request, encode_notification, encode_request};
pub use error::{ConnectionError, ProtocolError};
