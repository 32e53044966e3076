//! Decoding half of the codec contract.

use super::error::CodecError;

/// Parse a value from its deterministic binary wire form.
pub trait Decode: Sized {
    /// Decode a value starting at `offset`.
    ///
    /// Returns the value and the number of bytes consumed. The returned value
    /// owns its storage; no reference to `buf` is retained.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the buffer is exhausted mid-parse, the bytes
    /// are malformed, or a decoded length violates the type's policy or the
    /// resource ceilings in [`limits`](crate::limits).
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError>;

    /// Decode a value from the start of `buf`, discarding the consumed count.
    ///
    /// # Errors
    ///
    /// Same conditions as [`decode_from`](Decode::decode_from).
    fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        Self::decode_from(buf, 0).map(|(value, _)| value)
    }
}
