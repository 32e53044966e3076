//! Variable-length integer encoding.
//!
//! Encodes a natural number in `[0, 2^64 − 1]` in one to nine bytes, with
//! values below 2^7 taking a single byte. The first byte carries a unary
//! prefix of `L` set high bits followed by a zero bit; the remaining low bits
//! of the first byte hold the value's top bits and the next `L` bytes hold
//! the rest little-endian. Values of 2^56 and above use the `0xFF` marker
//! byte followed by all eight value bytes little-endian.
//!
//! ```text
//! value < 2^7    0vvvvvvv
//! value < 2^14   10vvvvvv vvvvvvvv
//! value < 2^21   110vvvvv vvvvvvvv vvvvvvvv
//! ...
//! value < 2^56   11111110 v×7
//! otherwise      11111111 v×8
//! ```
//!
//! The scheme is canonical: every value has exactly one encoding, and
//! [`decode_from`] rejects any byte sequence that is not the minimal form of
//! its value.

use crate::codec::CodecError;

/// Maximum encoded size: the `0xFF` marker plus eight little-endian bytes.
pub const MAX_SIZE: usize = 9;

/// Exact encoded byte length for `value`.
#[must_use]
pub const fn encoded_size(value: u64) -> usize {
    if value < 1 << 7 {
        1
    } else if value < 1 << 56 {
        let bits = 64 - value.leading_zeros() as usize;
        1 + (bits - 1) / 7
    } else {
        MAX_SIZE
    }
}

/// Encode `value` at `offset` into `buf`, returning the bytes written.
///
/// # Errors
///
/// Returns [`CodecError::BufferTooSmall`] if fewer than
/// [`encoded_size(value)`](encoded_size) bytes are available at `offset`.
pub fn encode_into(value: u64, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
    let size = encoded_size(value);
    let buf_len = buf.len();
    let out = buf
        .get_mut(offset..offset + size)
        .ok_or(CodecError::short(offset, size, buf_len))?;
    let Some((head, tail)) = out.split_first_mut() else {
        return Err(CodecError::short(offset, size, buf_len));
    };

    if size == 1 {
        *head = value as u8;
    } else if size < MAX_SIZE {
        let payload = size - 1;
        let prefix = 0xFFu8 << (8 - payload);
        let high = (value >> (8 * payload)) as u8;
        *head = prefix | high;
        for (dst, src) in tail.iter_mut().zip(value.to_le_bytes()) {
            *dst = src;
        }
    } else {
        *head = 0xFF;
        tail.copy_from_slice(&value.to_le_bytes());
    }
    Ok(size)
}

/// Decode a varint at `offset`, returning the value and the bytes consumed.
///
/// # Errors
///
/// Returns [`CodecError::BufferTooSmall`] if the buffer ends mid-varint, and
/// [`CodecError::NonCanonicalVarint`] if the bytes are not the minimal
/// encoding of the decoded value.
pub fn decode_from(buf: &[u8], offset: usize) -> Result<(u64, usize), CodecError> {
    let tag = *buf
        .get(offset)
        .ok_or(CodecError::short(offset, 1, buf.len()))?;

    if tag < 0x80 {
        return Ok((u64::from(tag), 1));
    }

    if tag == 0xFF {
        let src = buf
            .get(offset + 1..offset + MAX_SIZE)
            .ok_or(CodecError::short(offset, MAX_SIZE, buf.len()))?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(src);
        let value = u64::from_le_bytes(bytes);
        if value < 1 << 56 {
            return Err(CodecError::NonCanonicalVarint);
        }
        return Ok((value, MAX_SIZE));
    }

    let payload = tag.leading_ones() as usize;
    let src = buf
        .get(offset + 1..offset + 1 + payload)
        .ok_or(CodecError::short(offset, 1 + payload, buf.len()))?;
    let mut bytes = [0u8; 8];
    for (dst, byte) in bytes.iter_mut().zip(src) {
        *dst = *byte;
    }
    let low = u64::from_le_bytes(bytes);
    let high = u64::from(tag) + (1u64 << (8 - payload)) - 256;
    let value = (high << (8 * payload)) | low;
    if encoded_size(value) != 1 + payload {
        return Err(CodecError::NonCanonicalVarint);
    }
    Ok((value, 1 + payload))
}
