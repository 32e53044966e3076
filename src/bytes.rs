//! Opaque octet containers, fixed and variable.
//!
//! The fixed flavor is a plain `[u8; N]`: the payload is exactly `N` bytes
//! with no length prefix, and the width is part of the type. [`ByteArray`]
//! is the variable flavor: a varint byte-count prefix followed by the
//! payload, with an optional `[MIN, MAX]` length policy enforced on every
//! mutation. A policy with `MIN == MAX > 0` pins the length, and the prefix
//! is omitted just as for the array form.

use alloc::vec::Vec;

use serde_json::Value;

use crate::codec::json::{bytes_to_hex, hex_to_bytes};
use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::limits::{MAX_BYTE_ARRAY_BYTES, UNBOUNDED};
use crate::varint;

/// 16 fixed bytes, no length prefix.
pub type Bytes16 = [u8; 16];
/// 32 fixed bytes, no length prefix.
pub type Bytes32 = [u8; 32];
/// 64 fixed bytes, no length prefix.
pub type Bytes64 = [u8; 64];
/// 128 fixed bytes, no length prefix.
pub type Bytes128 = [u8; 128];
/// 256 fixed bytes, no length prefix.
pub type Bytes256 = [u8; 256];
/// 512 fixed bytes, no length prefix.
pub type Bytes512 = [u8; 512];
/// 1024 fixed bytes, no length prefix.
pub type Bytes1024 = [u8; 1024];

impl<const N: usize> Encode for [u8; N] {
    fn encoded_size(&self) -> usize {
        N
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let buf_len = buf.len();
        let out = buf
            .get_mut(offset..offset + N)
            .ok_or(CodecError::short(offset, N, buf_len))?;
        out.copy_from_slice(self);
        Ok(N)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let src = buf
            .get(offset..offset + N)
            .ok_or(CodecError::short(offset, N, buf.len()))?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(src);
        Ok((bytes, N))
    }
}

impl<const N: usize> ToJson for [u8; N] {
    fn to_json(&self) -> Value {
        Value::String(bytes_to_hex(self))
    }
}

impl<const N: usize> FromJson for [u8; N] {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        let text = value.as_str().ok_or(JsonError::Shape {
            expected: "hex string",
        })?;
        let raw = hex_to_bytes(text)?;
        if raw.len() != N {
            return Err(JsonError::Codec(CodecError::LengthOutOfPolicy {
                len: raw.len(),
                min: N,
                max: N,
            }));
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&raw);
        Ok(bytes)
    }
}

/// A variable-size octet container with a `[MIN, MAX]` length policy.
///
/// Owns its storage and grows geometrically on append. Every mutation checks
/// the resulting length against the policy first and leaves the container
/// unchanged on failure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteArray<const MIN: usize = 0, const MAX: usize = UNBOUNDED> {
    data: Vec<u8>,
}

impl<const MAX: usize> Default for ByteArray<0, MAX> {
    fn default() -> Self {
        ByteArray { data: Vec::new() }
    }
}

impl<const MIN: usize, const MAX: usize> ByteArray<MIN, MAX> {
    /// The pinned length when the policy is fixed (`MIN == MAX > 0`).
    #[must_use]
    pub const fn fixed_len() -> Option<usize> {
        if MIN == MAX && MIN > 0 {
            Some(MIN)
        } else {
            None
        }
    }

    fn check_len(len: usize) -> Result<(), CodecError> {
        if len < MIN || len > MAX {
            return Err(CodecError::LengthOutOfPolicy {
                len,
                min: MIN,
                max: MAX,
            });
        }
        Ok(())
    }

    /// Build from raw contents, validating the length policy.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if `data.len()` is outside
    /// `[MIN, MAX]`.
    pub fn try_new(data: Vec<u8>) -> Result<Self, CodecError> {
        Self::check_len(data.len())?;
        Ok(ByteArray { data })
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The contents as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the container and return its contents.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The byte at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Overwrite the byte at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), CodecError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(CodecError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn push(&mut self, value: u8) -> Result<(), CodecError> {
        Self::check_len(self.data.len() + 1)?;
        self.data.push(value);
        Ok(())
    }

    /// Append a slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if the resulting length
    /// exceeds `MAX`; the container is unchanged in that case.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        Self::check_len(self.data.len() + bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Insert one byte at `index`, shifting the rest right.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index > len`, or
    /// [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn insert(&mut self, index: usize, value: u8) -> Result<(), CodecError> {
        let len = self.data.len();
        if index > len {
            return Err(CodecError::IndexOutOfBounds { index, len });
        }
        Self::check_len(len + 1)?;
        self.data.insert(index, value);
        Ok(())
    }

    /// Remove and return the last byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] on an empty container, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn pop(&mut self) -> Result<u8, CodecError> {
        let new_len = self
            .data
            .len()
            .checked_sub(1)
            .ok_or(CodecError::IndexOutOfBounds { index: 0, len: 0 })?;
        Self::check_len(new_len)?;
        self.data.pop().ok_or(CodecError::IndexOutOfBounds {
            index: 0,
            len: 0,
        })
    }

    /// Remove and return the byte at `index`, shifting the rest left.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn remove(&mut self, index: usize) -> Result<u8, CodecError> {
        let len = self.data.len();
        if index >= len {
            return Err(CodecError::IndexOutOfBounds { index, len });
        }
        Self::check_len(len - 1)?;
        Ok(self.data.remove(index))
    }
}

impl<const MIN: usize, const MAX: usize> TryFrom<Vec<u8>> for ByteArray<MIN, MAX> {
    type Error = CodecError;

    fn try_from(data: Vec<u8>) -> Result<Self, CodecError> {
        Self::try_new(data)
    }
}

impl<const MIN: usize, const MAX: usize> TryFrom<&[u8]> for ByteArray<MIN, MAX> {
    type Error = CodecError;

    fn try_from(data: &[u8]) -> Result<Self, CodecError> {
        Self::try_new(data.to_vec())
    }
}

impl<const MIN: usize, const MAX: usize> AsRef<[u8]> for ByteArray<MIN, MAX> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const MIN: usize, const MAX: usize> Encode for ByteArray<MIN, MAX> {
    fn encoded_size(&self) -> usize {
        match Self::fixed_len() {
            Some(len) => len,
            None => varint::encoded_size(self.data.len() as u64) + self.data.len(),
        }
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let mut written = 0;
        if Self::fixed_len().is_none() {
            written += varint::encode_into(self.data.len() as u64, buf, offset)?;
        }
        let buf_len = buf.len();
        let out = buf
            .get_mut(offset + written..offset + written + self.data.len())
            .ok_or(CodecError::short(
                offset + written,
                self.data.len(),
                buf_len,
            ))?;
        out.copy_from_slice(&self.data);
        Ok(written + self.data.len())
    }
}

impl<const MIN: usize, const MAX: usize> Decode for ByteArray<MIN, MAX> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (len, prefix) = match Self::fixed_len() {
            Some(len) => (len, 0),
            None => {
                let (raw, prefix) = varint::decode_from(buf, offset)?;
                let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
                    what: "byte array",
                    len: usize::MAX,
                    max: MAX_BYTE_ARRAY_BYTES,
                })?;
                if len > MAX_BYTE_ARRAY_BYTES {
                    return Err(CodecError::TooLong {
                        what: "byte array",
                        len,
                        max: MAX_BYTE_ARRAY_BYTES,
                    });
                }
                Self::check_len(len)?;
                (len, prefix)
            }
        };
        let src = buf
            .get(offset + prefix..offset + prefix + len)
            .ok_or(CodecError::short(offset + prefix, len, buf.len()))?;
        Ok((
            ByteArray {
                data: src.to_vec(),
            },
            prefix + len,
        ))
    }
}

impl<const MIN: usize, const MAX: usize> ToJson for ByteArray<MIN, MAX> {
    fn to_json(&self) -> Value {
        Value::String(bytes_to_hex(&self.data))
    }
}

impl<const MIN: usize, const MAX: usize> FromJson for ByteArray<MIN, MAX> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        let text = value.as_str().ok_or(JsonError::Shape {
            expected: "hex string",
        })?;
        let raw = hex_to_bytes(text)?;
        Self::try_new(raw).map_err(JsonError::Codec)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn fixed_bytes_have_no_prefix() {
        let value = *b"abcd";
        assert_eq!(value.encode().unwrap(), b"abcd");
        let (decoded, consumed) = <[u8; 4]>::decode_from(b"abcd", 0).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn variable_bytes_carry_prefix() {
        let value: ByteArray = ByteArray::try_new(b"ab".to_vec()).unwrap();
        assert_eq!(value.encode().unwrap(), [0x02, 0x61, 0x62]);

        let value: ByteArray = ByteArray::try_new(alloc::vec![0x00, 0xFF]).unwrap();
        assert_eq!(value.encode().unwrap(), [0x02, 0x00, 0xFF]);
    }

    #[test]
    fn fixed_policy_omits_prefix() {
        let value: ByteArray<2, 2> = ByteArray::try_new(b"hi".to_vec()).unwrap();
        assert_eq!(value.encode().unwrap(), b"hi");
        let (decoded, consumed) = ByteArray::<2, 2>::decode_from(b"hi", 0).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn policy_is_enforced_on_construction() {
        assert!(matches!(
            ByteArray::<4, 8>::try_new(b"ab".to_vec()),
            Err(CodecError::LengthOutOfPolicy {
                len: 2,
                min: 4,
                max: 8
            })
        ));
    }

    #[test]
    fn mutation_respects_policy_and_leaves_state() {
        let mut value: ByteArray<0, 2> = ByteArray::try_new(b"ab".to_vec()).unwrap();
        assert!(matches!(
            value.push(b'c'),
            Err(CodecError::LengthOutOfPolicy { len: 3, .. })
        ));
        assert_eq!(value.as_slice(), b"ab");

        let mut value: ByteArray<2, 4> = ByteArray::try_new(b"ab".to_vec()).unwrap();
        assert!(matches!(
            value.pop(),
            Err(CodecError::LengthOutOfPolicy { len: 1, .. })
        ));
        assert_eq!(value.as_slice(), b"ab");
    }

    #[test]
    fn list_like_mutation() {
        let mut value: ByteArray = ByteArray::default();
        value.push(b'a').unwrap();
        value.extend_from_slice(b"cd").unwrap();
        value.insert(1, b'b').unwrap();
        assert_eq!(value.as_slice(), b"abcd");
        assert_eq!(value.remove(0).unwrap(), b'a');
        assert_eq!(value.pop().unwrap(), b'd');
        value.set(0, b'x').unwrap();
        assert_eq!(value.as_slice(), b"xc");
        assert_eq!(value.get(7), None);
    }

    #[test]
    fn decode_validates_policy() {
        // Prefix declares 1 byte, but the policy demands at least 2.
        assert!(matches!(
            ByteArray::<2, 4>::decode_from(&[0x01, 0x61], 0),
            Err(CodecError::LengthOutOfPolicy { len: 1, .. })
        ));
    }

    #[test]
    fn truncated_payload_fails() {
        assert!(matches!(
            ByteArray::<0, { UNBOUNDED }>::decode_from(&[0x05, 0x01, 0x02], 0),
            Err(CodecError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn json_hex_forms() {
        let value: ByteArray = ByteArray::try_new(alloc::vec![0xDE, 0xAD]).unwrap();
        assert_eq!(value.to_json(), Value::String("dead".into()));
        assert_eq!(ByteArray::<0, { UNBOUNDED }>::from_json(&value.to_json()).unwrap(), value);
        // A leading 0x is tolerated on input.
        assert_eq!(
            ByteArray::<0, { UNBOUNDED }>::from_json(&Value::String("0xdead".into())).unwrap(),
            value
        );

        let fixed = [0xABu8, 0xCD];
        assert_eq!(fixed.to_json(), Value::String("abcd".into()));
        assert_eq!(<[u8; 2]>::from_json(&fixed.to_json()).unwrap(), fixed);
        assert!(matches!(
            <[u8; 4]>::from_json(&Value::String("abcd".into())),
            Err(JsonError::Codec(CodecError::LengthOutOfPolicy { len: 2, .. }))
        ));
    }
}
