//! Encoding half of the codec contract.

use alloc::vec;
use alloc::vec::Vec;

use super::error::CodecError;

/// Serialize a value into the deterministic binary wire form.
///
/// The encoding of a value is a pure function of the value: equal values
/// always produce identical bytes.
pub trait Encode {
    /// Exact byte length of the encoded form.
    ///
    /// `encode(v)` always returns exactly this many bytes; callers use it to
    /// pre-size buffers for [`encode_into`](Encode::encode_into).
    fn encoded_size(&self) -> usize;

    /// Write the encoded form at `offset` into a pre-sized buffer.
    ///
    /// Returns the number of bytes written, which always equals
    /// [`encoded_size`](Encode::encoded_size). Never allocates.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferTooSmall`] if the buffer cannot hold the
    /// encoding at `offset`. Nothing is written in that case beyond bytes of
    /// already-completed child encodings.
    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError>;

    /// Encode into a freshly allocated buffer of exactly the right size.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`encode_into`](Encode::encode_into); with the
    /// buffer pre-sized by [`encoded_size`](Encode::encoded_size) this only
    /// fires if an implementation's size disagrees with what it writes.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = vec![0u8; self.encoded_size()];
        let written = self.encode_into(&mut buf, 0)?;
        debug_assert_eq!(written, buf.len(), "encoded_size must match bytes written");
        Ok(buf)
    }
}
