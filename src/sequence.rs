//! Homogeneous sequences: the packed [`Seq`] of fixed-width integers and
//! the generic length-prefixed `Vec<T>`.
//!
//! [`Seq`] is the throughput type: its payload is `len · BYTE_SIZE`
//! little-endian bytes written through the bulk methods of
//! [`FixedInt`](crate::integer::FixedInt), which reduce to a straight copy
//! for byte elements. `Vec<T>` composes any codable element type with a
//! varint count prefix and per-element codec calls.

use alloc::vec::Vec;

use serde_json::Value;

use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::integer::FixedInt;
use crate::limits::{MAX_SEQUENCE_LENGTH, UNBOUNDED};
use crate::varint;

/// A sequence of fixed-width unsigned integers with packed storage and a
/// `[MIN, MAX]` length policy.
///
/// All elements share the element type's byte width; the wire form is an
/// optional varint count prefix (omitted when `MIN == MAX > 0`) followed by
/// the packed little-endian payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seq<T: FixedInt, const MIN: usize = 0, const MAX: usize = UNBOUNDED> {
    items: Vec<T>,
}

impl<T: FixedInt, const MAX: usize> Default for Seq<T, 0, MAX> {
    fn default() -> Self {
        Seq { items: Vec::new() }
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> Seq<T, MIN, MAX> {
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

    /// Build from elements, validating the length policy.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if `items.len()` is outside
    /// `[MIN, MAX]`.
    pub fn try_new(items: Vec<T>) -> Result<Self, CodecError> {
        Self::check_len(items.len())?;
        Ok(Seq { items })
    }

    /// Current element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the sequence and return its elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).copied()
    }

    /// Overwrite the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), CodecError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(CodecError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Append one element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn push(&mut self, value: T) -> Result<(), CodecError> {
        Self::check_len(self.items.len() + 1)?;
        self.items.push(value);
        Ok(())
    }

    /// Append a value given as a `u64`, checking the element range.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] if `value` does not fit the element
    /// width, or [`CodecError::LengthOutOfPolicy`] if growing past `MAX`. The
    /// sequence is unchanged on failure.
    pub fn push_u64(&mut self, value: u64) -> Result<(), CodecError> {
        let element = T::try_from_u64(value)?;
        self.push(element)
    }

    /// Insert a value given as a `u64` at `index`, checking the element
    /// range.
    ///
    /// # Errors
    ///
    /// Same conditions as [`push_u64`](Seq::push_u64) and
    /// [`insert`](Seq::insert). The sequence is unchanged on failure.
    pub fn insert_u64(&mut self, index: usize, value: u64) -> Result<(), CodecError> {
        let element = T::try_from_u64(value)?;
        self.insert(index, element)
    }

    /// Append a slice of elements.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if the resulting length
    /// exceeds `MAX`; the sequence is unchanged in that case.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), CodecError> {
        Self::check_len(self.items.len() + items.len())?;
        self.items.extend_from_slice(items);
        Ok(())
    }

    /// Insert one element at `index`, shifting the rest right.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index > len`, or
    /// [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), CodecError> {
        let len = self.items.len();
        if index > len {
            return Err(CodecError::IndexOutOfBounds { index, len });
        }
        Self::check_len(len + 1)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Remove and return the last element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] on an empty sequence, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn pop(&mut self) -> Result<T, CodecError> {
        let new_len = self
            .items
            .len()
            .checked_sub(1)
            .ok_or(CodecError::IndexOutOfBounds { index: 0, len: 0 })?;
        Self::check_len(new_len)?;
        self.items
            .pop()
            .ok_or(CodecError::IndexOutOfBounds { index: 0, len: 0 })
    }

    /// Remove and return the element at `index`, shifting the rest left.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn remove(&mut self, index: usize) -> Result<T, CodecError> {
        let len = self.items.len();
        if index >= len {
            return Err(CodecError::IndexOutOfBounds { index, len });
        }
        Self::check_len(len - 1)?;
        Ok(self.items.remove(index))
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> TryFrom<Vec<T>> for Seq<T, MIN, MAX> {
    type Error = CodecError;

    fn try_from(items: Vec<T>) -> Result<Self, CodecError> {
        Self::try_new(items)
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> Encode for Seq<T, MIN, MAX> {
    fn encoded_size(&self) -> usize {
        let payload = self.items.len() * T::BYTE_SIZE;
        match Self::fixed_len() {
            Some(_) => payload,
            None => varint::encoded_size(self.items.len() as u64) + payload,
        }
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let mut written = 0;
        if Self::fixed_len().is_none() {
            written += varint::encode_into(self.items.len() as u64, buf, offset)?;
        }
        let payload = self.items.len() * T::BYTE_SIZE;
        let buf_len = buf.len();
        let out = buf
            .get_mut(offset + written..offset + written + payload)
            .ok_or(CodecError::short(offset + written, payload, buf_len))?;
        T::write_slice_le(&self.items, out);
        Ok(written + payload)
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> Decode for Seq<T, MIN, MAX> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (len, prefix) = match Self::fixed_len() {
            Some(len) => (len, 0),
            None => {
                let (raw, prefix) = varint::decode_from(buf, offset)?;
                let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
                    what: "sequence",
                    len: usize::MAX,
                    max: MAX_SEQUENCE_LENGTH,
                })?;
                if len > MAX_SEQUENCE_LENGTH {
                    return Err(CodecError::TooLong {
                        what: "sequence",
                        len,
                        max: MAX_SEQUENCE_LENGTH,
                    });
                }
                Self::check_len(len)?;
                (len, prefix)
            }
        };
        let payload = len.checked_mul(T::BYTE_SIZE).ok_or(CodecError::TooLong {
            what: "sequence",
            len,
            max: MAX_SEQUENCE_LENGTH,
        })?;
        let src = buf
            .get(offset + prefix..offset + prefix + payload)
            .ok_or(CodecError::short(offset + prefix, payload, buf.len()))?;
        let mut items = Vec::with_capacity(len);
        T::read_slice_le(src, &mut items);
        Ok((Seq { items }, prefix + payload))
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> ToJson for Seq<T, MIN, MAX> {
    fn to_json(&self) -> Value {
        Value::Array(
            self.items
                .iter()
                .map(|item| Value::from(item.into_u64()))
                .collect(),
        )
    }
}

impl<T: FixedInt, const MIN: usize, const MAX: usize> FromJson for Seq<T, MIN, MAX> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        let raw = value.as_array().ok_or(JsonError::Shape {
            expected: "array of integers",
        })?;
        let mut items = Vec::with_capacity(raw.len());
        for entry in raw {
            let number = entry.as_u64().ok_or(JsonError::Shape {
                expected: "unsigned integer",
            })?;
            items.push(T::try_from_u64(number)?);
        }
        Self::try_new(items).map_err(JsonError::Codec)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encoded_size(&self) -> usize {
        varint::encoded_size(self.len() as u64)
            + self.iter().map(Encode::encoded_size).sum::<usize>()
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let mut written = varint::encode_into(self.len() as u64, buf, offset)?;
        for item in self {
            written += item.encode_into(buf, offset + written)?;
        }
        Ok(written)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (raw, mut consumed) = varint::decode_from(buf, offset)?;
        let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
            what: "sequence",
            len: usize::MAX,
            max: MAX_SEQUENCE_LENGTH,
        })?;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(CodecError::TooLong {
                what: "sequence",
                len,
                max: MAX_SEQUENCE_LENGTH,
            });
        }
        let mut items = Vec::new();
        for _ in 0..len {
            let (item, size) = T::decode_from(buf, offset + consumed)?;
            items.push(item);
            consumed += size;
        }
        Ok((items, consumed))
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(ToJson::to_json).collect())
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        let raw = value.as_array().ok_or(JsonError::Shape {
            expected: "array",
        })?;
        raw.iter().map(T::from_json).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

    use super::*;
    use crate::codec::Codec;

    #[test]
    fn packed_little_endian_payload() {
        let seq: Seq<u16> = Seq::try_new(alloc::vec![0x0102, 0x0304]).unwrap();
        assert_eq!(seq.encode().unwrap(), [0x02, 0x02, 0x01, 0x04, 0x03]);
    }

    #[test]
    fn fixed_policy_omits_prefix() {
        let seq: Seq<u8, 3, 3> = Seq::try_new(alloc::vec![1, 2, 3]).unwrap();
        assert_eq!(seq.encode().unwrap(), [1, 2, 3]);
        let (decoded, consumed) = Seq::<u8, 3, 3>::decode_from(&[1, 2, 3], 0).unwrap();
        assert_eq!(decoded, seq);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn round_trip_all_widths() {
        fn check<T: FixedInt + Codec>(items: Vec<T>) {
            let seq: Seq<T> = Seq::try_new(items).unwrap();
            let buf = seq.encode().unwrap();
            assert_eq!(buf.len(), seq.encoded_size());
            let (decoded, consumed) = Seq::<T>::decode_from(&buf, 0).unwrap();
            assert_eq!(decoded, seq);
            assert_eq!(consumed, buf.len());
        }
        check::<u8>(alloc::vec![0, 1, 255]);
        check::<u16>(alloc::vec![0, 513, u16::MAX]);
        check::<u32>(alloc::vec![0, 70_000, u32::MAX]);
        check::<u64>(alloc::vec![0, 1 << 40, u64::MAX]);
    }

    #[test]
    fn push_u64_checks_element_range() {
        let mut seq: Seq<u16> = Seq::default();
        seq.push_u64(65535).unwrap();
        assert_eq!(
            seq.push_u64(70000),
            Err(CodecError::OutOfRange {
                value: 70000,
                byte_size: 2
            })
        );
        assert_eq!(seq.as_slice(), [65535]);
    }

    #[test]
    fn mutation_respects_policy() {
        let mut seq: Seq<u32, 1, 2> = Seq::try_new(alloc::vec![7]).unwrap();
        seq.push(8).unwrap();
        assert!(matches!(
            seq.push(9),
            Err(CodecError::LengthOutOfPolicy { len: 3, .. })
        ));
        seq.pop().unwrap();
        assert!(matches!(
            seq.pop(),
            Err(CodecError::LengthOutOfPolicy { len: 0, .. })
        ));
        assert_eq!(seq.as_slice(), [7]);

        seq.insert(0, 6).unwrap();
        assert_eq!(seq.remove(1).unwrap(), 7);
        seq.set(0, 5).unwrap();
        assert_eq!(seq.get(0), Some(5));
    }

    #[test]
    fn truncated_payload_fails() {
        assert!(matches!(
            Seq::<u32>::decode_from(&[0x02, 0x01, 0x00, 0x00], 0),
            Err(CodecError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn generic_vec_wire_form() {
        // Strings are dynamically sized, so the generic path frames each
        // element with its own prefix.
        let items = alloc::vec![
            alloc::string::String::from("ab"),
            alloc::string::String::from("c"),
        ];
        let buf = items.encode().unwrap();
        assert_eq!(buf, [0x02, 0x02, 0x61, 0x62, 0x01, 0x63]);
        let decoded = Vec::<alloc::string::String>::decode(&buf).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn json_forms() {
        let seq: Seq<u16> = Seq::try_new(alloc::vec![1, 2, 3]).unwrap();
        let json = seq.to_json();
        assert_eq!(json, serde_json::json!([1, 2, 3]));
        assert_eq!(Seq::<u16>::from_json(&json).unwrap(), seq);

        assert_eq!(
            Seq::<u8>::from_json(&serde_json::json!([300])),
            Err(JsonError::Codec(CodecError::OutOfRange {
                value: 300,
                byte_size: 1
            }))
        );
    }
}
