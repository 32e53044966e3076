//! Ordered heterogeneous records.
//!
//! The [`structure!`] macro declares a named struct whose fields all
//! implement the codec contract. The wire form concatenates each field's
//! encoding in declaration order with no separators, padding, or per-field
//! length prefixes — each field's own codec provides whatever framing it
//! needs. Field order is part of the binary contract.
//!
//! The JSON form is an object keyed by field name; a field may carry an
//! `as "json_name"` rename for its JSON key. Decoding from JSON requires
//! every declared field to be present.

/// Resolves a field's JSON name: the rename literal if given, otherwise the
/// field identifier itself.
#[doc(hidden)]
#[macro_export]
macro_rules! __structure_json_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident $name:literal) => {
        $name
    };
}

/// Declare a record type implementing the codec contract.
///
/// ```
/// use lamina::structure;
/// use lamina::codec::{Decode, Encode};
///
/// structure! {
///     /// A tiny header.
///     pub struct Header {
///         pub version: u8,
///         pub flags: u16,
///     }
/// }
///
/// let header = Header { version: 1, flags: 0x0203 };
/// let buf = header.encode()?;
/// assert_eq!(buf, [0x01, 0x03, 0x02]);
/// assert_eq!(Header::decode(&buf)?, header);
/// # Ok::<(), lamina::codec::CodecError>(())
/// ```
#[macro_export]
macro_rules! structure {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(as $json_name:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )+
        }

        impl $crate::codec::Encode for $name {
            fn encoded_size(&self) -> usize {
                0 $( + $crate::codec::Encode::encoded_size(&self.$field) )+
            }

            fn encode_into(
                &self,
                buf: &mut [u8],
                offset: usize,
            ) -> Result<usize, $crate::codec::CodecError> {
                let mut written = 0;
                $(
                    written += $crate::codec::Encode::encode_into(
                        &self.$field,
                        buf,
                        offset + written,
                    )?;
                )+
                Ok(written)
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                buf: &[u8],
                offset: usize,
            ) -> Result<(Self, usize), $crate::codec::CodecError> {
                let mut consumed = 0;
                $(
                    let ($field, size) =
                        <$ty as $crate::codec::Decode>::decode_from(buf, offset + consumed)?;
                    consumed += size;
                )+
                Ok((Self { $( $field, )+ }, consumed))
            }
        }

        impl $crate::codec::ToJson for $name {
            fn to_json(&self) -> $crate::serde_json::Value {
                let mut object = $crate::serde_json::Map::new();
                $(
                    object.insert(
                        $crate::__structure_json_name!($field $($json_name)?).into(),
                        $crate::codec::ToJson::to_json(&self.$field),
                    );
                )+
                $crate::serde_json::Value::Object(object)
            }
        }

        impl $crate::codec::FromJson for $name {
            fn from_json(
                value: &$crate::serde_json::Value,
            ) -> Result<Self, $crate::codec::JsonError> {
                let object = value.as_object().ok_or($crate::codec::JsonError::Shape {
                    expected: "object",
                })?;
                $(
                    let $field = <$ty as $crate::codec::FromJson>::from_json(
                        object
                            .get($crate::__structure_json_name!($field $($json_name)?))
                            .ok_or($crate::codec::JsonError::MissingField(
                                $crate::__structure_json_name!($field $($json_name)?),
                            ))?,
                    )?;
                )+
                Ok(Self { $( $field, )+ })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

    use alloc::string::String;

    use crate::bytes::ByteArray;
    use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};

    structure! {
        struct Pair {
            a: u8,
            b: u16,
        }
    }

    structure! {
        /// Mixes a leaf with a dynamically sized field.
        struct Tagged {
            tag: u8,
            payload: ByteArray,
        }
    }

    structure! {
        struct Person {
            name: String as "first_name",
            age: u8,
        }
    }

    #[test]
    fn fields_concatenate_in_declaration_order() {
        let pair = Pair { a: 1, b: 0x0203 };
        assert_eq!(pair.encode().unwrap(), [0x01, 0x03, 0x02]);
        let (decoded, consumed) = Pair::decode_from(&[0x01, 0x03, 0x02], 0).unwrap();
        assert_eq!(decoded, pair);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn dynamic_fields_carry_their_own_framing() {
        let tagged = Tagged {
            tag: 7,
            payload: ByteArray::try_new(b"hi".to_vec()).unwrap(),
        };
        assert_eq!(tagged.encode().unwrap(), [0x07, 0x02, 0x68, 0x69]);
        let decoded = Tagged::decode(&[0x07, 0x02, 0x68, 0x69]).unwrap();
        assert_eq!(decoded, tagged);
    }

    #[test]
    fn truncated_field_fails() {
        assert!(matches!(
            Pair::decode(&[0x01, 0x03]),
            Err(CodecError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn json_object_with_renames() {
        let person = Person {
            name: "Ada".into(),
            age: 36,
        };
        let json = person.to_json();
        assert_eq!(json, serde_json::json!({"first_name": "Ada", "age": 36}));
        assert_eq!(Person::from_json(&json).unwrap(), person);
    }

    #[test]
    fn json_requires_every_field() {
        assert_eq!(
            Person::from_json(&serde_json::json!({"first_name": "Ada"})),
            Err(JsonError::MissingField("age"))
        );
    }
}
