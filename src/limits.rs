//! Resource ceilings for decode operations.
//!
//! A length prefix is attacker-controlled data: without a ceiling, a
//! nine-byte message could demand a multi-gigabyte allocation before the
//! parser notices the buffer ends. Decoders check these limits before
//! allocating and fail with [`CodecError::TooLong`](crate::codec::CodecError)
//! when a declared length exceeds them.

/// The default `MAX` of every length policy: no upper bound.
pub const UNBOUNDED: usize = usize::MAX;

/// Maximum element count in a decoded sequence.
pub const MAX_SEQUENCE_LENGTH: usize = 10_000_000;

/// Maximum entry count in a decoded dictionary.
pub const MAX_DICTIONARY_ENTRIES: usize = 1_000_000;

/// Maximum payload size of a decoded byte array, in bytes.
pub const MAX_BYTE_ARRAY_BYTES: usize = 100_000_000;

/// Maximum payload size of a decoded string, in UTF-8 bytes.
pub const MAX_STRING_BYTES: usize = 10_000_000;

/// Maximum bit count of a decoded bit container.
pub const MAX_BITS_LENGTH: usize = 80_000_000;
