//! Packed boolean sequences with a configurable on-wire bit order.
//!
//! [`Bits`] stores booleans packed eight to a byte. The internal layout is
//! always LSB-first: logical bit `8b + i` lives in byte `b` at position `i`.
//! The *wire* layout within each byte is chosen by the [`BitOrder`] marker:
//! [`Msb`] places logical bit 0 of each group of eight at position 7,
//! [`Lsb`] at position 0. Unused positions of the final byte are zero on the
//! wire.
//!
//! Like the other containers, a `[MIN, MAX]` length policy is enforced after
//! every mutation, and a fixed policy (`MIN == MAX > 0`) omits the varint
//! bit-count prefix.

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::Range;

use serde_json::Value;

use crate::codec::json::{bytes_to_hex, hex_to_bytes};
use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::limits::{MAX_BITS_LENGTH, UNBOUNDED};
use crate::varint;

/// On-wire ordering of bits within each byte.
pub trait BitOrder {
    /// True when logical bit 0 of each group of eight lands in bit 7.
    const MSB_FIRST: bool;
}

/// Most-significant-bit-first wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msb;

/// Least-significant-bit-first wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lsb;

impl BitOrder for Msb {
    const MSB_FIRST: bool = true;
}

impl BitOrder for Lsb {
    const MSB_FIRST: bool = false;
}

/// An ordered sequence of booleans with packed storage.
pub struct Bits<O: BitOrder = Msb, const MIN: usize = 0, const MAX: usize = UNBOUNDED> {
    /// Packed LSB-first: logical bit `8b + i` is byte `b`, position `i`.
    /// Positions at or beyond `len` are zero.
    bytes: Vec<u8>,
    len: usize,
    _order: PhantomData<O>,
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> core::fmt::Debug for Bits<O, MIN, MAX> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> Clone for Bits<O, MIN, MAX> {
    fn clone(&self) -> Self {
        Bits {
            bytes: self.bytes.clone(),
            len: self.len,
            _order: PhantomData,
        }
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> PartialEq for Bits<O, MIN, MAX> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes == other.bytes
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> Eq for Bits<O, MIN, MAX> {}

impl<O: BitOrder, const MAX: usize> Default for Bits<O, 0, MAX> {
    fn default() -> Self {
        Bits {
            bytes: Vec::new(),
            len: 0,
            _order: PhantomData,
        }
    }
}

const fn byte_count(bits: usize) -> usize {
    bits.div_ceil(8)
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> Bits<O, MIN, MAX> {
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

    /// Build from a slice of booleans, validating the length policy.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if `bits.len()` is outside
    /// `[MIN, MAX]`.
    pub fn from_bools(bits: &[bool]) -> Result<Self, CodecError> {
        Self::check_len(bits.len())?;
        let mut bytes = alloc::vec![0u8; byte_count(bits.len())];
        for (index, bit) in bits.iter().enumerate() {
            if *bit {
                if let Some(byte) = bytes.get_mut(index / 8) {
                    *byte |= 1 << (index % 8);
                }
            }
        }
        Ok(Bits {
            bytes,
            len: bits.len(),
            _order: PhantomData,
        })
    }

    /// Number of logical bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bit(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte >> (index % 8) & 1 == 1)
    }

    /// The bit at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| self.bit(index))
    }

    /// Overwrite the bit at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), CodecError> {
        if index >= self.len {
            return Err(CodecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        if let Some(byte) = self.bytes.get_mut(index / 8) {
            if value {
                *byte |= 1 << (index % 8);
            } else {
                *byte &= !(1 << (index % 8));
            }
        }
        Ok(())
    }

    /// Append one bit.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn push(&mut self, value: bool) -> Result<(), CodecError> {
        Self::check_len(self.len + 1)?;
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        let index = self.len;
        self.len += 1;
        if value {
            if let Some(byte) = self.bytes.get_mut(index / 8) {
                *byte |= 1 << (index % 8);
            }
        }
        Ok(())
    }

    /// Append a slice of bits.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if the resulting length
    /// exceeds `MAX`; the container is unchanged in that case.
    pub fn extend_from_bools(&mut self, bits: &[bool]) -> Result<(), CodecError> {
        Self::check_len(self.len + bits.len())?;
        for bit in bits {
            // Checked above; push cannot fail on the MAX side now.
            let _ = self.push(*bit);
        }
        Ok(())
    }

    /// Insert one bit at `index`, shifting later bits up.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index > len`, or
    /// [`CodecError::LengthOutOfPolicy`] if growing past `MAX`.
    pub fn insert(&mut self, index: usize, value: bool) -> Result<(), CodecError> {
        if index > self.len {
            return Err(CodecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Self::check_len(self.len + 1)?;
        let _ = self.push(false);
        let mut cursor = self.len - 1;
        while cursor > index {
            let below = self.bit(cursor - 1);
            let _ = self.set(cursor, below);
            cursor -= 1;
        }
        let _ = self.set(index, value);
        Ok(())
    }

    /// Remove and return the last bit.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] on an empty container, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn pop(&mut self) -> Result<bool, CodecError> {
        let new_len = self
            .len
            .checked_sub(1)
            .ok_or(CodecError::IndexOutOfBounds { index: 0, len: 0 })?;
        Self::check_len(new_len)?;
        let value = self.bit(new_len);
        self.truncate_storage(new_len);
        Ok(value)
    }

    /// Remove and return the bit at `index`, shifting later bits down.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if `index >= len`, or
    /// [`CodecError::LengthOutOfPolicy`] if shrinking below `MIN`.
    pub fn remove(&mut self, index: usize) -> Result<bool, CodecError> {
        if index >= self.len {
            return Err(CodecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Self::check_len(self.len - 1)?;
        let value = self.bit(index);
        for cursor in index..self.len - 1 {
            let above = self.bit(cursor + 1);
            let _ = self.set(cursor, above);
        }
        self.truncate_storage(self.len - 1);
        Ok(value)
    }

    fn truncate_storage(&mut self, new_len: usize) {
        self.len = new_len;
        self.bytes.truncate(byte_count(new_len));
        self.mask_tail();
    }

    /// Zero the storage positions at or beyond `len` in the last byte.
    fn mask_tail(&mut self) {
        let used = self.len % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= (1 << used) - 1;
            }
        }
    }

    /// The bits in `range` as booleans, or `None` if out of bounds.
    #[must_use]
    pub fn get_range(&self, range: Range<usize>) -> Option<Vec<bool>> {
        if range.start > range.end || range.end > self.len {
            return None;
        }
        Some(range.map(|index| self.bit(index)).collect())
    }

    /// Overwrite `bits.len()` bits starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfBounds`] if the range does not fit in
    /// the current length; the container is unchanged in that case.
    pub fn set_range(&mut self, start: usize, bits: &[bool]) -> Result<(), CodecError> {
        let end = start + bits.len();
        if end > self.len {
            return Err(CodecError::IndexOutOfBounds {
                index: end,
                len: self.len,
            });
        }
        for (index, bit) in bits.iter().enumerate() {
            let _ = self.set(start + index, *bit);
        }
        Ok(())
    }

    /// Iterate over the bits in logical order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|index| self.bit(index))
    }

    /// The bits as a vector of booleans.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }

    /// The packed wire bytes, honoring the type's bit order.
    #[must_use]
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        if O::MSB_FIRST {
            self.bytes.iter().map(|byte| byte.reverse_bits()).collect()
        } else {
            self.bytes.clone()
        }
    }

    /// Rebuild from packed wire bytes and a bit count, honoring the type's
    /// bit order. Storage positions beyond `len` are masked off.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOutOfPolicy`] if `len` is outside
    /// `[MIN, MAX]`, or [`CodecError::BufferTooSmall`] if `packed` holds
    /// fewer than `⌈len/8⌉` bytes.
    pub fn from_wire_bytes(packed: &[u8], len: usize) -> Result<Self, CodecError> {
        Self::check_len(len)?;
        let needed = byte_count(len);
        let src = packed
            .get(..needed)
            .ok_or(CodecError::short(0, needed, packed.len()))?;
        let bytes = if O::MSB_FIRST {
            src.iter().map(|byte| byte.reverse_bits()).collect()
        } else {
            src.to_vec()
        };
        let mut bits = Bits {
            bytes,
            len,
            _order: PhantomData,
        };
        bits.mask_tail();
        Ok(bits)
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> Encode for Bits<O, MIN, MAX> {
    fn encoded_size(&self) -> usize {
        let payload = byte_count(self.len);
        match Self::fixed_len() {
            Some(_) => payload,
            None => varint::encoded_size(self.len as u64) + payload,
        }
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let mut written = 0;
        if Self::fixed_len().is_none() {
            written += varint::encode_into(self.len as u64, buf, offset)?;
        }
        let payload = byte_count(self.len);
        let buf_len = buf.len();
        let out = buf
            .get_mut(offset + written..offset + written + payload)
            .ok_or(CodecError::short(offset + written, payload, buf_len))?;
        if O::MSB_FIRST {
            for (dst, src) in out.iter_mut().zip(&self.bytes) {
                *dst = src.reverse_bits();
            }
        } else {
            out.copy_from_slice(&self.bytes);
        }
        Ok(written + payload)
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> Decode for Bits<O, MIN, MAX> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (len, prefix) = match Self::fixed_len() {
            Some(len) => (len, 0),
            None => {
                let (raw, prefix) = varint::decode_from(buf, offset)?;
                let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
                    what: "bits",
                    len: usize::MAX,
                    max: MAX_BITS_LENGTH,
                })?;
                if len > MAX_BITS_LENGTH {
                    return Err(CodecError::TooLong {
                        what: "bits",
                        len,
                        max: MAX_BITS_LENGTH,
                    });
                }
                Self::check_len(len)?;
                (len, prefix)
            }
        };
        let payload = byte_count(len);
        let src = buf
            .get(offset + prefix..offset + prefix + payload)
            .ok_or(CodecError::short(offset + prefix, payload, buf.len()))?;
        let bits = Self::from_wire_bytes(src, len)?;
        Ok((bits, prefix + payload))
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> ToJson for Bits<O, MIN, MAX> {
    fn to_json(&self) -> Value {
        Value::String(bytes_to_hex(&self.to_wire_bytes()))
    }
}

impl<O: BitOrder, const MIN: usize, const MAX: usize> FromJson for Bits<O, MIN, MAX> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        let text = value.as_str().ok_or(JsonError::Shape {
            expected: "hex string",
        })?;
        let packed = hex_to_bytes(text)?;
        // The hex form does not carry an exact bit count: a fixed policy pins
        // it, otherwise every packed byte contributes eight bits.
        let len = Self::fixed_len().unwrap_or(packed.len() * 8);
        if packed.len() != byte_count(len) {
            return Err(JsonError::Codec(CodecError::LengthOutOfPolicy {
                len: packed.len() * 8,
                min: MIN,
                max: MAX,
            }));
        }
        Self::from_wire_bytes(&packed, len).map_err(JsonError::Codec)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn msb_wire_form() {
        let bits: Bits = Bits::from_bools(&[true, false, true]).unwrap();
        assert_eq!(bits.encode().unwrap(), [0x03, 0xA0]);
    }

    #[test]
    fn lsb_wire_form() {
        let bits: Bits<Lsb> = Bits::from_bools(&[true, false, true]).unwrap();
        assert_eq!(bits.encode().unwrap(), [0x03, 0x05]);

        let bits: Bits<Lsb> = Bits::from_bools(&[true, false, true, true]).unwrap();
        assert_eq!(bits.encode().unwrap(), [0x04, 0x0D]);
    }

    #[test]
    fn fixed_policy_omits_prefix() {
        let bits: Bits<Msb, 3, 3> = Bits::from_bools(&[true, false, true]).unwrap();
        assert_eq!(bits.encode().unwrap(), [0xA0]);
        let (decoded, consumed) = Bits::<Msb, 3, 3>::decode_from(&[0xA0], 0).unwrap();
        assert_eq!(decoded, bits);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn round_trip_both_orders() {
        let pattern: Vec<bool> = (0..19).map(|i| i % 3 == 0).collect();

        let msb: Bits = Bits::from_bools(&pattern).unwrap();
        let buf = msb.encode().unwrap();
        assert_eq!(buf.len(), msb.encoded_size());
        let (decoded, consumed) = Bits::<Msb>::decode_from(&buf, 0).unwrap();
        assert_eq!(decoded, msb);
        assert_eq!(consumed, buf.len());

        let lsb: Bits<Lsb> = Bits::from_bools(&pattern).unwrap();
        let buf = lsb.encode().unwrap();
        let decoded = Bits::<Lsb>::decode(&buf).unwrap();
        assert_eq!(decoded.to_bools(), pattern);
    }

    #[test]
    fn fixed_length_policy_rejects_mismatch() {
        assert!(matches!(
            Bits::<Msb, 3, 3>::from_bools(&[true, false, true, true]),
            Err(CodecError::LengthOutOfPolicy {
                len: 4,
                min: 3,
                max: 3
            })
        ));
    }

    #[test]
    fn mutations() {
        let mut bits: Bits = Bits::from_bools(&[true, false]).unwrap();
        bits.push(true).unwrap();
        assert_eq!(bits.to_bools(), [true, false, true]);

        bits.extend_from_bools(&[false, true]).unwrap();
        assert_eq!(bits.to_bools(), [true, false, true, false, true]);

        bits.insert(1, true).unwrap();
        assert_eq!(bits.to_bools(), [true, true, false, true, false, true]);

        assert!(bits.remove(0).unwrap());
        assert_eq!(bits.to_bools(), [true, false, true, false, true]);

        assert!(bits.pop().unwrap());
        assert_eq!(bits.len(), 4);

        bits.set(1, true).unwrap();
        assert_eq!(bits.get(1), Some(true));
        assert_eq!(bits.get(17), None);
    }

    #[test]
    fn mutation_failure_leaves_container_unchanged() {
        let mut bits: Bits<Msb, 2, 3> = Bits::from_bools(&[true, false, true]).unwrap();
        assert!(bits.push(true).is_err());
        assert_eq!(bits.to_bools(), [true, false, true]);

        let mut bits: Bits<Msb, 3, 3> = Bits::from_bools(&[true, false, true]).unwrap();
        assert!(bits.pop().is_err());
        assert!(bits.extend_from_bools(&[true]).is_err());
        assert_eq!(bits.to_bools(), [true, false, true]);
    }

    #[test]
    fn range_access() {
        let mut bits: Bits = Bits::from_bools(&[true, false, true, false, true]).unwrap();
        assert_eq!(bits.get_range(1..4), Some(alloc::vec![false, true, false]));
        assert_eq!(bits.get_range(3..9), None);

        bits.set_range(1, &[true, true]).unwrap();
        assert_eq!(bits.to_bools(), [true, true, true, false, true]);
        assert!(bits.set_range(4, &[true, true]).is_err());
    }

    #[test]
    fn insert_across_byte_boundary() {
        let pattern: Vec<bool> = (0..9).map(|i| i % 2 == 0).collect();
        let mut bits: Bits = Bits::from_bools(&pattern).unwrap();
        bits.insert(0, false).unwrap();
        let mut expected = alloc::vec![false];
        expected.extend(&pattern);
        assert_eq!(bits.to_bools(), expected);
    }

    #[test]
    fn tail_bits_are_zero_on_wire() {
        let mut bits: Bits<Lsb> = Bits::from_bools(&[true; 8]).unwrap();
        for _ in 0..5 {
            bits.pop().unwrap();
        }
        // Three bits remain; the unused five positions must encode as zero.
        assert_eq!(bits.encode().unwrap(), [0x03, 0b0000_0111]);
    }

    #[test]
    fn json_hex_form() {
        let bits: Bits<Msb, 8, 8> =
            Bits::from_bools(&[true, false, true, false, true, false, true, false]).unwrap();
        assert_eq!(bits.to_json(), Value::String("aa".into()));
        assert_eq!(Bits::<Msb, 8, 8>::from_json(&bits.to_json()).unwrap(), bits);
        assert_eq!(
            Bits::<Msb, 8, 8>::from_json(&Value::String("0xaa".into())).unwrap(),
            bits
        );

        // Fixed policy pins a non-multiple-of-eight length.
        let bits: Bits<Msb, 3, 3> = Bits::from_bools(&[true, false, true]).unwrap();
        assert_eq!(bits.to_json(), Value::String("a0".into()));
        assert_eq!(Bits::<Msb, 3, 3>::from_json(&bits.to_json()).unwrap(), bits);
    }
}
