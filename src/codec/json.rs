//! The JSON half of the codec contract.
//!
//! Every codable type has a symmetric JSON form: integers stay numbers, byte
//! and bit containers become lowercase hex strings (no `0x` prefix), options
//! become `null` or the inner form, choices become `{"tag", "value"}`
//! objects, structures become objects keyed by field name, and dictionaries
//! become objects when their key type has a string-like JSON form.

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;

use super::error::JsonError;

/// Convert a value to its JSON form.
pub trait ToJson {
    /// Whether this type's JSON form is a string usable as an object key.
    ///
    /// [`Dict`](crate::dictionary::Dict) values keyed by such a type
    /// serialize to a JSON object instead of a list of entry records.
    const JSON_STRING_KEY: bool = false;

    /// The JSON form of the value.
    fn to_json(&self) -> Value;

    /// The value rendered as a JSON object key.
    ///
    /// Returns `None` unless [`JSON_STRING_KEY`](ToJson::JSON_STRING_KEY)
    /// holds for the type.
    fn to_json_key(&self) -> Option<String> {
        None
    }
}

/// Rebuild a value from its JSON form.
pub trait FromJson: Sized {
    /// Parse a value from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] if the JSON value has the wrong shape for the
    /// type, or if the carried value violates the type's own constraints
    /// (range, length policy, hex well-formedness).
    fn from_json(value: &Value) -> Result<Self, JsonError>;

    /// Parse a value from a JSON object key.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::KeyNotSupported`] unless the type opts in by
    /// setting [`ToJson::JSON_STRING_KEY`].
    fn from_json_key(_key: &str) -> Result<Self, JsonError> {
        Err(JsonError::KeyNotSupported {
            type_name: core::any::type_name::<Self>(),
        })
    }
}

/// Render bytes as the JSON hex form: lowercase, no `0x` prefix.
#[must_use]
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse the JSON hex form, tolerating (but never producing) a leading `0x`.
pub(crate) fn hex_to_bytes(text: &str) -> Result<Vec<u8>, JsonError> {
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(stripped).map_err(|_| JsonError::InvalidHex)
}
