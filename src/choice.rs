//! Tagged sums: [`Null`], `Option<T>`, and the [`choice!`] macro.
//!
//! `Option<T>` writes a single discriminator byte (0 absent, 1 present)
//! followed by the payload when present. [`choice!`] declares an enum of
//! named alternatives whose wire form is a varint alternative index followed
//! by the chosen payload. Unknown discriminators are fatal on decode.

use serde_json::Value;

use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};

/// The unit value. Encodes to zero bytes; its JSON form is `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Null;

impl Encode for Null {
    fn encoded_size(&self) -> usize {
        0
    }

    fn encode_into(&self, _buf: &mut [u8], _offset: usize) -> Result<usize, CodecError> {
        Ok(0)
    }
}

impl Decode for Null {
    fn decode_from(_buf: &[u8], _offset: usize) -> Result<(Self, usize), CodecError> {
        Ok((Null, 0))
    }
}

impl ToJson for Null {
    fn to_json(&self) -> Value {
        Value::Null
    }
}

impl FromJson for Null {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        if value.is_null() {
            Ok(Null)
        } else {
            Err(JsonError::Shape { expected: "null" })
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encoded_size(&self) -> usize {
        match self {
            None => 1,
            Some(inner) => 1 + inner.encoded_size(),
        }
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let buf_len = buf.len();
        let tag = buf
            .get_mut(offset)
            .ok_or(CodecError::short(offset, 1, buf_len))?;
        match self {
            None => {
                *tag = 0;
                Ok(1)
            }
            Some(inner) => {
                *tag = 1;
                Ok(1 + inner.encode_into(buf, offset + 1)?)
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let tag = *buf
            .get(offset)
            .ok_or(CodecError::short(offset, 1, buf.len()))?;
        match tag {
            0 => Ok((None, 1)),
            1 => {
                let (inner, consumed) = T::decode_from(buf, offset + 1)?;
                Ok((Some(inner), 1 + consumed))
            }
            _ => Err(CodecError::UnknownDiscriminator {
                tag: u64::from(tag),
                type_name: "Option",
            }),
        }
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            None => Value::Null,
            Some(inner) => inner.to_json(),
        }
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_json(value).map(Some)
        }
    }
}

/// Declare an enum of named alternatives implementing the codec contract.
///
/// Each alternative carries one payload type and an explicit zero-based
/// index, which becomes the varint discriminator on the wire. The JSON form
/// is `{"tag": "<variant>", "value": <inner>}`.
///
/// ```
/// use lamina::choice;
/// use lamina::choice::Null;
/// use lamina::codec::{Decode, Encode};
///
/// choice! {
///     /// A heartbeat or a payload-carrying frame.
///     pub enum Frame {
///         0 => Ping(Null),
///         1 => Data(Vec<u8>),
///     }
/// }
///
/// let frame = Frame::Data(vec![7]);
/// let buf = frame.encode()?;
/// assert_eq!(buf, [0x01, 0x01, 0x07]);
/// assert_eq!(Frame::decode(&buf)?, frame);
/// # Ok::<(), lamina::codec::CodecError>(())
/// ```
#[macro_export]
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $index:literal => $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($ty), )+
        }

        impl $crate::codec::Encode for $name {
            fn encoded_size(&self) -> usize {
                match self {
                    $(
                        Self::$variant(inner) => $crate::varint::encoded_size($index)
                            + $crate::codec::Encode::encoded_size(inner),
                    )+
                }
            }

            fn encode_into(
                &self,
                buf: &mut [u8],
                offset: usize,
            ) -> Result<usize, $crate::codec::CodecError> {
                match self {
                    $(
                        Self::$variant(inner) => {
                            let mut written = $crate::varint::encode_into($index, buf, offset)?;
                            written += $crate::codec::Encode::encode_into(
                                inner,
                                buf,
                                offset + written,
                            )?;
                            Ok(written)
                        }
                    )+
                }
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                buf: &[u8],
                offset: usize,
            ) -> Result<(Self, usize), $crate::codec::CodecError> {
                let (tag, tag_size) = $crate::varint::decode_from(buf, offset)?;
                match tag {
                    $(
                        $index => {
                            let (inner, inner_size) =
                                <$ty as $crate::codec::Decode>::decode_from(
                                    buf,
                                    offset + tag_size,
                                )?;
                            Ok((Self::$variant(inner), tag_size + inner_size))
                        }
                    )+
                    _ => Err($crate::codec::CodecError::UnknownDiscriminator {
                        tag,
                        type_name: stringify!($name),
                    }),
                }
            }
        }

        impl $crate::codec::ToJson for $name {
            fn to_json(&self) -> $crate::serde_json::Value {
                let (tag, value) = match self {
                    $(
                        Self::$variant(inner) => (
                            stringify!($variant),
                            $crate::codec::ToJson::to_json(inner),
                        ),
                    )+
                };
                let mut object = $crate::serde_json::Map::new();
                object.insert("tag".into(), $crate::serde_json::Value::String(tag.into()));
                object.insert("value".into(), value);
                $crate::serde_json::Value::Object(object)
            }
        }

        impl $crate::codec::FromJson for $name {
            fn from_json(
                value: &$crate::serde_json::Value,
            ) -> Result<Self, $crate::codec::JsonError> {
                let object = value.as_object().ok_or($crate::codec::JsonError::Shape {
                    expected: "object with tag and value",
                })?;
                let tag = object
                    .get("tag")
                    .and_then($crate::serde_json::Value::as_str)
                    .ok_or($crate::codec::JsonError::Shape {
                        expected: "string tag",
                    })?;
                let inner = object
                    .get("value")
                    .ok_or($crate::codec::JsonError::MissingField("value"))?;
                match tag {
                    $(
                        stringify!($variant) => Ok(Self::$variant(
                            <$ty as $crate::codec::FromJson>::from_json(inner)?,
                        )),
                    )+
                    _ => Err($crate::codec::JsonError::UnknownTag(tag.into())),
                }
            }
        }
    };
}
