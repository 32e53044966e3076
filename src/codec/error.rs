//! Error types for the codec contract.

use alloc::string::String;

use thiserror::Error;

/// Errors from binary encoding, decoding, and container mutation.
///
/// No partial state survives an error: a failed decode returns nothing, and a
/// failed mutation leaves the container unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer cannot hold the requested read or write at `offset`.
    #[error("buffer too small at offset {offset}: need {need} bytes, have {have}")]
    BufferTooSmall {
        /// Offset where the access was attempted.
        offset: usize,
        /// Bytes needed from `offset`.
        need: usize,
        /// Bytes actually available from `offset`.
        have: usize,
    },

    /// A varint that does not use the minimal encoding for its value.
    #[error("varint is not in canonical form")]
    NonCanonicalVarint,

    /// A string payload that is not well-formed UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// An option or choice discriminator with no matching alternative.
    #[error("unknown discriminator {tag} for {type_name}")]
    UnknownDiscriminator {
        /// The discriminator value found on the wire.
        tag: u64,
        /// Name of the type being decoded.
        type_name: &'static str,
    },

    /// A container length outside its declared `[min, max]` policy.
    #[error("length {len} outside policy [{min}, {max}]")]
    LengthOutOfPolicy {
        /// The offending length.
        len: usize,
        /// Minimum admissible length.
        min: usize,
        /// Maximum admissible length.
        max: usize,
    },

    /// An integer value that does not fit its declared byte width.
    #[error("value {value} does not fit in {byte_size} bytes")]
    OutOfRange {
        /// The offending value.
        value: i128,
        /// Declared element width in bytes.
        byte_size: usize,
    },

    /// A decoded length prefix above the resource ceiling for its type.
    #[error("{what} too long: {len} elements, max {max}")]
    TooLong {
        /// What kind of container was being decoded.
        what: &'static str,
        /// The declared length.
        len: usize,
        /// The ceiling from [`limits`](crate::limits).
        max: usize,
    },

    /// Dictionary keys not in strictly ascending order.
    #[error("dictionary keys not sorted at entry {index}")]
    UnsortedKeys {
        /// Index of the first out-of-order entry.
        index: usize,
    },

    /// A duplicate dictionary key.
    #[error("duplicate dictionary key at entry {index}")]
    DuplicateKey {
        /// Index of the duplicated entry.
        index: usize,
    },

    /// An index past the end of a container.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Current container length.
        len: usize,
    },
}

impl CodecError {
    /// A [`CodecError::BufferTooSmall`] for an access of `need` bytes at
    /// `offset` into a buffer of `buf_len` total bytes.
    #[must_use]
    pub(crate) fn short(offset: usize, need: usize, buf_len: usize) -> Self {
        CodecError::BufferTooSmall {
            offset,
            need,
            have: buf_len.saturating_sub(offset),
        }
    }
}

/// Errors from the JSON half of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    /// A JSON value of the wrong shape for the target type.
    #[error("expected JSON {expected}")]
    Shape {
        /// Description of the expected JSON shape.
        expected: &'static str,
    },

    /// A hex string that is not well-formed.
    #[error("invalid hex string")]
    InvalidHex,

    /// A structure field absent from the JSON object.
    #[error("missing field {0:?}")]
    MissingField(&'static str),

    /// A choice tag with no matching alternative.
    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    /// A dictionary keyed by a type with no string-like JSON form was given
    /// in JSON object form.
    #[error("{type_name} cannot be used as a JSON object key")]
    KeyNotSupported {
        /// Name of the key type.
        type_name: &'static str,
    },

    /// A value-level violation surfaced while rebuilding from JSON.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
