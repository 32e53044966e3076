//! Deterministic typed binary codec with a parallel JSON form.
//!
//! This crate defines a small collection of value types that all implement a
//! single codec contract, producing a length-prefixed binary wire format that
//! is byte-for-byte reproducible: independent of host byte order, map
//! iteration order, and platform word size. The same contract carries a JSON
//! form for debugging and interop.
//!
//! # Format Overview
//!
//! All multi-byte integers are little-endian. Length prefixes use the varint
//! scheme of [`varint`]. A message has no self-describing envelope; its
//! grammar is determined entirely by the root type.
//!
//! | Type | Bytes on wire |
//! |------|---------------|
//! | `u8`..`u64` | exactly the type's width, little-endian |
//! | `i8`..`i64` | width bytes, biased by 2^(bits−1), little-endian |
//! | [`Uint`](integer::Uint) | varint, 1–9 bytes |
//! | `[u8; N]` | the `N` payload bytes, no prefix |
//! | [`ByteArray`](bytes::ByteArray) | varint byte count, then payload |
//! | [`Bits`](bits::Bits) | varint bit count, then packed bytes |
//! | [`Seq`](sequence::Seq) | varint element count, then packed elements |
//! | `String` | varint byte count, then UTF-8 bytes |
//! | `Option<T>` | one discriminator byte, then the payload if present |
//! | [`choice!`] enums | varint alternative index, then the payload |
//! | [`Dict`](dictionary::Dict) | varint entry count, then sorted key/value pairs |
//! | [`structure!`] records | field encodings concatenated in declaration order |
//!
//! Containers whose length policy is fixed (`MIN == MAX > 0`) omit their
//! length prefix.
//!
//! # Determinism
//!
//! Encoding a value is a pure function of the value: dictionaries are written
//! in ascending key order regardless of insertion order, varints are minimal,
//! and decoders reject non-canonical input (non-minimal varints, unsorted or
//! duplicated dictionary keys). Two equal values always produce identical
//! bytes, which makes the format suitable for hashing and signing.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod bits;
pub mod bytes;
pub mod choice;
pub mod codec;
pub mod dictionary;
pub mod integer;
pub mod limits;
pub mod sequence;
pub mod string;
pub mod structure;
pub mod varint;

/// Re-exported for the JSON half of the codec contract and for use by the
/// [`choice!`] and [`structure!`] macros.
pub use serde_json;
