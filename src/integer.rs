//! Integer types: fixed-width primitives and the varint-backed [`Uint`].
//!
//! Fixed-width unsigned integers encode as exactly their width in
//! little-endian bytes. Signed integers are biased by 2^(bits−1) before
//! serialization — equivalent to flipping the sign bit — so that the encoded
//! bytes of two signed values compare in the same order as the values
//! themselves. [`Uint`] carries a natural number as a varint.

use alloc::vec::Vec;

use serde_json::Value;

use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::varint;

/// A natural number in `[0, 2^64 − 1]` carried on the wire as a varint.
///
/// Unlike the fixed-width primitives, the encoded length depends on the
/// value: small numbers take one byte. This is the same scheme used for
/// every length prefix in the format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint(pub u64);

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Uint(value)
    }
}

impl From<Uint> for u64 {
    fn from(value: Uint) -> Self {
        value.0
    }
}

impl core::fmt::Display for Uint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl Encode for Uint {
    fn encoded_size(&self) -> usize {
        varint::encoded_size(self.0)
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        varint::encode_into(self.0, buf, offset)
    }
}

impl Decode for Uint {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (value, consumed) = varint::decode_from(buf, offset)?;
        Ok((Uint(value), consumed))
    }
}

impl ToJson for Uint {
    fn to_json(&self) -> Value {
        Value::from(self.0)
    }
}

impl FromJson for Uint {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        value.as_u64().map(Uint).ok_or(JsonError::Shape {
            expected: "unsigned integer",
        })
    }
}

/// A fixed-width unsigned integer usable as a typed-sequence element.
///
/// Implemented for `u8`, `u16`, `u32`, and `u64`. The bulk methods give
/// [`Seq`](crate::sequence::Seq) its memcpy-shaped path: the `u8`
/// implementation overrides them with straight slice copies, and the wider
/// widths compile down to an unrolled little-endian store loop.
pub trait FixedInt: Copy + PartialEq + core::fmt::Debug {
    /// Element width on the wire, in bytes.
    const BYTE_SIZE: usize;

    /// Write one element little-endian into `out`.
    ///
    /// `out` is exactly [`BYTE_SIZE`](FixedInt::BYTE_SIZE) bytes.
    fn write_le(self, out: &mut [u8]);

    /// Read one element from `src`, exactly [`BYTE_SIZE`](FixedInt::BYTE_SIZE)
    /// bytes.
    fn read_le(src: &[u8]) -> Self;

    /// Narrow from `u64`, checking the element's numeric range.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] when `value` does not fit.
    fn try_from_u64(value: u64) -> Result<Self, CodecError>;

    /// Widen to `u64`.
    fn into_u64(self) -> u64;

    /// Bulk-encode `items` into `out` (`items.len() * BYTE_SIZE` bytes).
    fn write_slice_le(items: &[Self], out: &mut [u8]) {
        for (item, chunk) in items.iter().zip(out.chunks_exact_mut(Self::BYTE_SIZE)) {
            item.write_le(chunk);
        }
    }

    /// Bulk-decode `src` (a whole number of elements) into `out`.
    fn read_slice_le(src: &[u8], out: &mut Vec<Self>) {
        for chunk in src.chunks_exact(Self::BYTE_SIZE) {
            out.push(Self::read_le(chunk));
        }
    }
}

macro_rules! impl_fixed_unsigned {
    ($($ty:ty => $size:expr),+ $(,)?) => { $(
        impl Encode for $ty {
            fn encoded_size(&self) -> usize {
                $size
            }

            fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
                let buf_len = buf.len();
                let out = buf
                    .get_mut(offset..offset + $size)
                    .ok_or(CodecError::short(offset, $size, buf_len))?;
                out.copy_from_slice(&self.to_le_bytes());
                Ok($size)
            }
        }

        impl Decode for $ty {
            fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
                let src = buf
                    .get(offset..offset + $size)
                    .ok_or(CodecError::short(offset, $size, buf.len()))?;
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(src);
                Ok((<$ty>::from_le_bytes(bytes), $size))
            }
        }

        impl ToJson for $ty {
            fn to_json(&self) -> Value {
                Value::from(u64::from(*self))
            }
        }

        impl FromJson for $ty {
            fn from_json(value: &Value) -> Result<Self, JsonError> {
                let raw = value.as_u64().ok_or(JsonError::Shape {
                    expected: "unsigned integer",
                })?;
                <$ty>::try_from(raw).map_err(|_| {
                    JsonError::Codec(CodecError::OutOfRange {
                        value: i128::from(raw),
                        byte_size: $size,
                    })
                })
            }
        }

    )+ };
}

impl_fixed_unsigned! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
}

macro_rules! impl_fixed_int_element {
    ($($ty:ty => $size:expr),+ $(,)?) => { $(
        impl FixedInt for $ty {
            const BYTE_SIZE: usize = $size;

            fn write_le(self, out: &mut [u8]) {
                for (dst, src) in out.iter_mut().zip(self.to_le_bytes()) {
                    *dst = src;
                }
            }

            fn read_le(src: &[u8]) -> Self {
                let mut bytes = [0u8; $size];
                for (dst, byte) in bytes.iter_mut().zip(src) {
                    *dst = *byte;
                }
                <$ty>::from_le_bytes(bytes)
            }

            fn try_from_u64(value: u64) -> Result<Self, CodecError> {
                <$ty>::try_from(value).map_err(|_| CodecError::OutOfRange {
                    value: i128::from(value),
                    byte_size: $size,
                })
            }

            fn into_u64(self) -> u64 {
                u64::from(self)
            }
        }
    )+ };
}

impl_fixed_int_element! {
    u16 => 2,
    u32 => 4,
    u64 => 8,
}

// The bulk path for single bytes is a straight copy.
impl FixedInt for u8 {
    const BYTE_SIZE: usize = 1;

    fn write_le(self, out: &mut [u8]) {
        if let Some(dst) = out.first_mut() {
            *dst = self;
        }
    }

    fn read_le(src: &[u8]) -> Self {
        src.first().copied().unwrap_or_default()
    }

    fn try_from_u64(value: u64) -> Result<Self, CodecError> {
        u8::try_from(value).map_err(|_| CodecError::OutOfRange {
            value: i128::from(value),
            byte_size: 1,
        })
    }

    fn into_u64(self) -> u64 {
        u64::from(self)
    }

    fn write_slice_le(items: &[Self], out: &mut [u8]) {
        out.copy_from_slice(items);
    }

    fn read_slice_le(src: &[u8], out: &mut Vec<Self>) {
        out.extend_from_slice(src);
    }
}

macro_rules! impl_fixed_signed {
    ($($ty:ty as $un:ty => $size:expr),+ $(,)?) => { $(
        impl Encode for $ty {
            fn encoded_size(&self) -> usize {
                $size
            }

            fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
                let biased = (*self as $un) ^ (1 << (<$un>::BITS - 1));
                let buf_len = buf.len();
                let out = buf
                    .get_mut(offset..offset + $size)
                    .ok_or(CodecError::short(offset, $size, buf_len))?;
                out.copy_from_slice(&biased.to_le_bytes());
                Ok($size)
            }
        }

        impl Decode for $ty {
            fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
                let src = buf
                    .get(offset..offset + $size)
                    .ok_or(CodecError::short(offset, $size, buf.len()))?;
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(src);
                let biased = <$un>::from_le_bytes(bytes);
                Ok(((biased ^ (1 << (<$un>::BITS - 1))) as $ty, $size))
            }
        }

        impl ToJson for $ty {
            fn to_json(&self) -> Value {
                Value::from(i64::from(*self))
            }
        }

        impl FromJson for $ty {
            fn from_json(value: &Value) -> Result<Self, JsonError> {
                let raw = value.as_i64().ok_or(JsonError::Shape {
                    expected: "integer",
                })?;
                <$ty>::try_from(raw).map_err(|_| {
                    JsonError::Codec(CodecError::OutOfRange {
                        value: i128::from(raw),
                        byte_size: $size,
                    })
                })
            }
        }
    )+ };
}

impl_fixed_signed! {
    i8 as u8 => 1,
    i16 as u16 => 2,
    i32 as u32 => 4,
    i64 as u64 => 8,
}
