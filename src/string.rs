//! UTF-8 text with a varint byte-length prefix.
//!
//! The codec contract is implemented directly on [`String`] (and on `str`
//! for encoding). The length prefix counts UTF-8 *bytes*, not code points,
//! and decoding validates well-formedness.

use alloc::borrow::ToOwned;
use alloc::string::String;

use serde_json::Value;

use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::limits::MAX_STRING_BYTES;
use crate::varint;

impl Encode for str {
    fn encoded_size(&self) -> usize {
        varint::encoded_size(self.len() as u64) + self.len()
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let written = varint::encode_into(self.len() as u64, buf, offset)?;
        let buf_len = buf.len();
        let out = buf
            .get_mut(offset + written..offset + written + self.len())
            .ok_or(CodecError::short(offset + written, self.len(), buf_len))?;
        out.copy_from_slice(self.as_bytes());
        Ok(written + self.len())
    }
}

impl Encode for String {
    fn encoded_size(&self) -> usize {
        self.as_str().encoded_size()
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        self.as_str().encode_into(buf, offset)
    }
}

impl Decode for String {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (raw, prefix) = varint::decode_from(buf, offset)?;
        let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
            what: "string",
            len: usize::MAX,
            max: MAX_STRING_BYTES,
        })?;
        if len > MAX_STRING_BYTES {
            return Err(CodecError::TooLong {
                what: "string",
                len,
                max: MAX_STRING_BYTES,
            });
        }
        let src = buf
            .get(offset + prefix..offset + prefix + len)
            .ok_or(CodecError::short(offset + prefix, len, buf.len()))?;
        let text = core::str::from_utf8(src).map_err(|_| CodecError::InvalidUtf8)?;
        Ok((text.to_owned(), prefix + len))
    }
}

impl ToJson for String {
    const JSON_STRING_KEY: bool = true;

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn to_json_key(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        value
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or(JsonError::Shape { expected: "string" })
    }

    fn from_json_key(key: &str) -> Result<Self, JsonError> {
        Ok(key.to_owned())
    }
}
