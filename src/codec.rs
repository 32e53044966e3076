//! The uniform codec contract.
//!
//! Every value type in this crate implements the same four-part contract:
//!
//! - [`Encode`] — exact size computation and serialization into a caller
//!   provided buffer
//! - [`Decode`] — parsing from a buffer plus offset, reporting bytes consumed
//! - [`ToJson`] / [`FromJson`] — the symmetric JSON form
//!
//! Composite types (options, choices, sequences, dictionaries, structures)
//! implement the contract by recursively invoking the contract of their
//! element types. There are no special cases: a [`Dict`](crate::dictionary::Dict)
//! of structures of sequences composes the same way a bare integer does.
//!
//! # Traversal
//!
//! Encoding and decoding are depth-first, left-to-right, and strictly
//! sequential: every byte is written or read at a monotonically increasing
//! offset. `encode_into` never allocates; `encode` performs exactly one
//! allocation of `encoded_size` bytes. Decoded values own their storage and
//! retain no reference to the input buffer.

pub mod decode;
pub mod encode;
pub mod error;
pub mod json;

pub use decode::Decode;
pub use encode::Encode;
pub use error::{CodecError, JsonError};
pub use json::{FromJson, ToJson};

/// A type with both encoding and decoding capabilities.
///
/// This is a convenience trait that combines [`Encode`] and [`Decode`].
/// Prefer the specific traits when possible:
///
/// - Use `T: Encode` when you only need to serialize
/// - Use `T: Decode` when you only need to deserialize
/// - Use `T: Codec` when you need both (e.g. roundtrip tests)
pub trait Codec: Encode + Decode {}

impl<T: Encode + Decode> Codec for T {}
