//! Deterministic sorted-key mappings.
//!
//! [`Dict`] stores its entries in a `BTreeMap`, so iteration — and therefore
//! encoding — is always in ascending order of the key's natural comparison.
//! Insertion order can never leak into the wire form: two dictionaries with
//! the same entries encode identically. The decoder holds received input to
//! the same standard, rejecting unsorted or duplicated keys.
//!
//! The per-entry fast paths of a dynamically typed implementation fall out
//! of monomorphization here: for fixed-width integer keys and values the
//! generic codec calls inline to bare little-endian stores.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::codec::{CodecError, Decode, Encode, FromJson, JsonError, ToJson};
use crate::limits::MAX_DICTIONARY_ENTRIES;
use crate::varint;

/// A finite mapping with unique keys and a deterministic encoded key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dict<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K, V> Default for Dict<K, V> {
    fn default() -> Self {
        Dict {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> Dict<K, V> {
    /// An empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, returning the previous value for the key if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// The value for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Remove the entry for `key`, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Whether an entry for `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over entries in ascending key order.
    pub fn iter(&self) -> alloc::collections::btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Iterate over keys in ascending order.
    pub fn keys(&self) -> alloc::collections::btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Iterate over values in ascending key order.
    pub fn values(&self) -> alloc::collections::btree_map::Values<'_, K, V> {
        self.entries.values()
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for Dict<K, V> {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Dict { entries }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Dict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Dict {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for Dict<K, V> {
    type Item = (K, V);
    type IntoIter = alloc::collections::btree_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Encode + Ord, V: Encode> Encode for Dict<K, V> {
    fn encoded_size(&self) -> usize {
        let mut total = varint::encoded_size(self.entries.len() as u64);
        for (key, value) in &self.entries {
            total += key.encoded_size() + value.encoded_size();
        }
        total
    }

    fn encode_into(&self, buf: &mut [u8], offset: usize) -> Result<usize, CodecError> {
        let mut written = varint::encode_into(self.entries.len() as u64, buf, offset)?;
        for (key, value) in &self.entries {
            written += key.encode_into(buf, offset + written)?;
            written += value.encode_into(buf, offset + written)?;
        }
        Ok(written)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for Dict<K, V> {
    fn decode_from(buf: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let (raw, mut consumed) = varint::decode_from(buf, offset)?;
        let len = usize::try_from(raw).map_err(|_| CodecError::TooLong {
            what: "dictionary",
            len: usize::MAX,
            max: MAX_DICTIONARY_ENTRIES,
        })?;
        if len > MAX_DICTIONARY_ENTRIES {
            return Err(CodecError::TooLong {
                what: "dictionary",
                len,
                max: MAX_DICTIONARY_ENTRIES,
            });
        }
        let mut entries: BTreeMap<K, V> = BTreeMap::new();
        for index in 0..len {
            let (key, key_size) = K::decode_from(buf, offset + consumed)?;
            consumed += key_size;
            let (value, value_size) = V::decode_from(buf, offset + consumed)?;
            consumed += value_size;
            if let Some((last, _)) = entries.last_key_value() {
                match last.cmp(&key) {
                    core::cmp::Ordering::Less => {}
                    core::cmp::Ordering::Equal => {
                        return Err(CodecError::DuplicateKey { index });
                    }
                    core::cmp::Ordering::Greater => {
                        return Err(CodecError::UnsortedKeys { index });
                    }
                }
            }
            entries.insert(key, value);
        }
        Ok((Dict { entries }, consumed))
    }
}

impl<K: ToJson + Ord, V: ToJson> Dict<K, V> {
    /// The entry-list JSON form with caller-chosen field names: an array of
    /// `{<key_name>: k, <value_name>: v}` records in ascending key order.
    #[must_use]
    pub fn to_json_entries(&self, key_name: &str, value_name: &str) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|(key, value)| {
                    let mut record = Map::new();
                    record.insert(key_name.into(), key.to_json());
                    record.insert(value_name.into(), value.to_json());
                    Value::Object(record)
                })
                .collect(),
        )
    }
}

impl<K: FromJson + Ord, V: FromJson> Dict<K, V> {
    /// Rebuild from the entry-list JSON form produced by
    /// [`to_json_entries`](Dict::to_json_entries).
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] on a malformed list, a missing field, or a
    /// duplicate key.
    pub fn from_json_entries(
        value: &Value,
        key_name: &'static str,
        value_name: &'static str,
    ) -> Result<Self, JsonError> {
        let records = value.as_array().ok_or(JsonError::Shape {
            expected: "array of entry records",
        })?;
        let mut dict = Dict::default();
        for (index, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or(JsonError::Shape {
                expected: "entry record object",
            })?;
            let key = object
                .get(key_name)
                .ok_or(JsonError::MissingField(key_name))?;
            let value = object
                .get(value_name)
                .ok_or(JsonError::MissingField(value_name))?;
            if dict
                .insert(K::from_json(key)?, V::from_json(value)?)
                .is_some()
            {
                return Err(JsonError::Codec(CodecError::DuplicateKey { index }));
            }
        }
        Ok(dict)
    }
}

impl<K: ToJson + Ord, V: ToJson> ToJson for Dict<K, V> {
    fn to_json(&self) -> Value {
        if K::JSON_STRING_KEY {
            let keys: Option<Vec<String>> = self.entries.keys().map(ToJson::to_json_key).collect();
            if let Some(keys) = keys {
                let mut object = Map::new();
                for (key, value) in keys.into_iter().zip(self.entries.values()) {
                    object.insert(key, value.to_json());
                }
                return Value::Object(object);
            }
        }
        self.to_json_entries("key", "value")
    }
}

impl<K: FromJson + Ord, V: FromJson> FromJson for Dict<K, V> {
    fn from_json(value: &Value) -> Result<Self, JsonError> {
        match value {
            Value::Object(object) => {
                let mut dict = Dict::default();
                for (key, value) in object {
                    dict.insert(K::from_json_key(key)?, V::from_json(value)?);
                }
                Ok(dict)
            }
            Value::Array(_) => Self::from_json_entries(value, "key", "value"),
            _ => Err(JsonError::Shape {
                expected: "object or array of entry records",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

    use super::*;

    fn sample() -> Dict<String, u16> {
        let mut dict = Dict::new();
        dict.insert("b".into(), 1);
        dict.insert("a".into(), 2);
        dict
    }

    #[test]
    fn keys_are_sorted_on_the_wire() {
        assert_eq!(
            sample().encode().unwrap(),
            [0x02, 0x01, 0x61, 0x02, 0x00, 0x01, 0x62, 0x01, 0x00]
        );
    }

    #[test]
    fn encoding_ignores_insertion_order() {
        let mut reversed = Dict::new();
        reversed.insert(String::from("a"), 2u16);
        reversed.insert(String::from("b"), 1u16);
        assert_eq!(sample().encode().unwrap(), reversed.encode().unwrap());
    }

    #[test]
    fn round_trip() {
        let dict = sample();
        let buf = dict.encode().unwrap();
        assert_eq!(buf.len(), dict.encoded_size());
        let (decoded, consumed) = Dict::<String, u16>::decode_from(&buf, 0).unwrap();
        assert_eq!(decoded, dict);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn integer_keyed_round_trip() {
        let mut dict: Dict<u32, u64> = Dict::new();
        dict.insert(5, 500);
        dict.insert(1, 100);
        dict.insert(3, 300);
        let buf = dict.encode().unwrap();
        let decoded = Dict::<u32, u64>::decode(&buf).unwrap();
        assert_eq!(decoded, dict);
    }

    #[test]
    fn rejects_unsorted_keys() {
        // {"b": 1} then {"a": 2}: out of order on the wire.
        let wire = [0x02, 0x01, 0x62, 0x01, 0x00, 0x01, 0x61, 0x02, 0x00];
        assert_eq!(
            Dict::<String, u16>::decode(&wire),
            Err(CodecError::UnsortedKeys { index: 1 })
        );
    }

    #[test]
    fn rejects_duplicate_keys() {
        let wire = [0x02, 0x01, 0x61, 0x01, 0x00, 0x01, 0x61, 0x02, 0x00];
        assert_eq!(
            Dict::<String, u16>::decode(&wire),
            Err(CodecError::DuplicateKey { index: 1 })
        );
    }

    #[test]
    fn truncated_entry_fails() {
        let wire = [0x02, 0x01, 0x61, 0x02];
        assert!(matches!(
            Dict::<String, u16>::decode(&wire),
            Err(CodecError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn string_keys_become_a_json_object() {
        let json = sample().to_json();
        assert_eq!(json, serde_json::json!({"a": 2, "b": 1}));
        assert_eq!(Dict::<String, u16>::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn integer_keys_become_entry_records() {
        let mut dict: Dict<u8, u16> = Dict::new();
        dict.insert(2, 20);
        dict.insert(1, 10);
        let json = dict.to_json();
        assert_eq!(
            json,
            serde_json::json!([
                {"key": 1, "value": 10},
                {"key": 2, "value": 20},
            ])
        );
        assert_eq!(Dict::<u8, u16>::from_json(&json).unwrap(), dict);
    }

    #[test]
    fn configured_entry_names() {
        let mut dict: Dict<u8, u16> = Dict::new();
        dict.insert(1, 10);
        let json = dict.to_json_entries("id", "count");
        assert_eq!(json, serde_json::json!([{"id": 1, "count": 10}]));
        assert_eq!(
            Dict::<u8, u16>::from_json_entries(&json, "id", "count").unwrap(),
            dict
        );
        assert_eq!(
            Dict::<u8, u16>::from_json_entries(&json, "key", "value"),
            Err(JsonError::MissingField("key"))
        );
    }

    #[test]
    fn object_form_requires_string_like_keys() {
        let json = serde_json::json!({"1": 10});
        assert!(matches!(
            Dict::<u8, u16>::from_json(&json),
            Err(JsonError::KeyNotSupported { .. })
        ));
    }
}
