//! JSON view of bencode values.
//!
//! Byte strings that are valid UTF-8 become JSON strings; anything else is
//! written as a `data:application/octet-stream;base64,` URI, which the
//! [`Encodable`](crate::Encodable) impl for `serde_json::Value` turns back
//! into raw bytes. Integers outside the 64-bit lanes stay JSON numbers, kept
//! digit-exact by serde_json's `arbitrary_precision` representation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use num_bigint::BigInt;
use serde_json::{Map, Number, Value as Json};

use crate::{BoolPolicy, Dict, EncodeError, Value};

/// Prefix marking a JSON string as base64-encoded binary data.
pub const BINARY_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Wraps raw bytes as a binary data URI.
pub fn encode_binary_uri(bytes: &[u8]) -> String {
    format!("{BINARY_URI_PREFIX}{}", STANDARD.encode(bytes))
}

/// Unwraps a binary data URI; `None` for plain text or malformed base64.
pub fn decode_binary_uri(s: &str) -> Option<Vec<u8>> {
    let payload = s.strip_prefix(BINARY_URI_PREFIX)?;
    STANDARD.decode(payload).ok()
}

/// The exact value of an integral JSON number; `None` for fractions and exponents.
pub fn number_to_bigint(n: &Number) -> Option<BigInt> {
    BigInt::parse_bytes(n.to_string().as_bytes(), 10)
}

fn bytes_to_json_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        // Text that happens to look like a data URI must stay binary.
        Ok(text) if !text.starts_with(BINARY_URI_PREFIX) => text.to_owned(),
        _ => encode_binary_uri(bytes),
    }
}

/// Converts a decoded value into its JSON view.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Integer(int) => {
            if let Some(v) = int.as_i64() {
                Json::from(v)
            } else if let Some(v) = int.as_u64() {
                Json::from(v)
            } else {
                match int.to_string().parse::<Number>() {
                    Ok(n) => Json::Number(n),
                    Err(_) => Json::String(int.to_string()),
                }
            }
        }
        Value::Bytes(bytes) => Json::String(bytes_to_json_string(bytes)),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Dict(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                map.insert(bytes_to_json_string(key), to_json(item));
            }
            Json::Object(map)
        }
    }
}

/// Builds a value tree from a JSON document.
///
/// Strings carrying [`BINARY_URI_PREFIX`] become raw bytes, both as values
/// and as keys. Keys that collide once unwrapped are rejected.
pub fn from_json(json: &Json, bools: BoolPolicy) -> Result<Value, EncodeError> {
    let value = match json {
        Json::Null => return Err(EncodeError::Unsupported("null")),
        Json::Bool(b) => match bools {
            BoolPolicy::AsInteger => Value::from(u8::from(*b)),
            BoolPolicy::Reject => return Err(EncodeError::BoolRejected),
        },
        Json::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(v), _) => Value::from(v),
            (None, Some(v)) => Value::from(v),
            (None, None) => match number_to_bigint(n) {
                Some(big) => Value::from(big),
                None => return Err(EncodeError::Unsupported("float")),
            },
        },
        Json::String(s) => Value::Bytes(json_string_to_bytes(s)),
        Json::Array(items) => Value::List(
            items
                .iter()
                .map(|item| from_json(item, bools))
                .collect::<Result<_, _>>()?,
        ),
        Json::Object(map) => {
            let mut dict = Dict::new();
            for (key, item) in map {
                let key = json_string_to_bytes(key);
                if dict.contains_key(&key) {
                    return Err(EncodeError::DuplicateKey(key));
                }
                let item = from_json(item, bools)?;
                dict.insert(key, item);
            }
            Value::Dict(dict)
        }
    };
    Ok(value)
}

fn json_string_to_bytes(s: &str) -> Vec<u8> {
    decode_binary_uri(s).unwrap_or_else(|| s.as_bytes().to_vec())
}
