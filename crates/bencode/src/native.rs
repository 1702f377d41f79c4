//! Capability contract for values the encoder can consume.
//!
//! The encoder never inspects concrete host types. Anything implementing
//! [`Encodable`] classifies itself into a closed set of [`Kind`]s and
//! exposes its children; the encoder handles canonical ordering, duplicate
//! detection and cycle detection on top of that.

use std::borrow::Cow;

use num_bigint::BigInt;

use crate::error::EncodeError;
use crate::json::{decode_binary_uri, number_to_bigint};
use crate::Value;

/// Classification of a native value.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Integers outside both 64-bit lanes.
    BigInt(Cow<'a, BigInt>),
    Bytes(Cow<'a, [u8]>),
    /// Text, written as its UTF-8 bytes.
    Text(&'a str),
    List,
    Dict,
    /// Anything else; carries a type name for the error message.
    Unsupported(&'static str),
}

/// A dictionary key as presented by a native mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key<'a> {
    Bytes(Cow<'a, [u8]>),
    Text(&'a str),
    /// A key of a type that has no byte-string form.
    Invalid(&'static str),
}

impl<'a> Key<'a> {
    /// The raw key bytes, or an error for keys that are not byte-string-like.
    pub fn into_bytes(self) -> Result<Cow<'a, [u8]>, EncodeError> {
        match self {
            Key::Bytes(b) => Ok(b),
            Key::Text(s) => Ok(Cow::Borrowed(s.as_bytes())),
            Key::Invalid(name) => Err(EncodeError::InvalidKey(name)),
        }
    }
}

/// Callback receiving the entries of a mapping in source order.
pub type EntriesFn<'f, T> =
    dyn for<'e> FnMut(Vec<(Key<'e>, &'e T)>) -> Result<(), EncodeError> + 'f;

/// Callback receiving one list element.
pub type ItemFn<'f, T> = dyn FnMut(&T) -> Result<(), EncodeError> + 'f;

/// A native value the encoder can consume.
///
/// Implementations classify themselves with [`kind`](Encodable::kind).
/// Lists hand their elements to [`for_each_item`](Encodable::for_each_item);
/// mappings hand all of their entries at once to
/// [`with_entries`](Encodable::with_entries), in any order.
///
/// [`identity`](Encodable::identity) must return the same number for two
/// handles to the same shared composite; the encoder uses it to reject
/// cycles. The default, the value's address, is right for owned trees.
pub trait Encodable: Sized {
    fn kind(&self) -> Kind<'_>;

    fn identity(&self) -> usize {
        self as *const Self as *const () as usize
    }

    fn for_each_item(&self, _visit: &mut ItemFn<'_, Self>) -> Result<(), EncodeError> {
        Ok(())
    }

    fn with_entries(&self, visit: &mut EntriesFn<'_, Self>) -> Result<(), EncodeError> {
        visit(Vec::new())
    }
}

impl Encodable for Value {
    fn kind(&self) -> Kind<'_> {
        match self {
            Value::Integer(int) => int.kind(),
            Value::Bytes(b) => Kind::Bytes(Cow::Borrowed(b)),
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    fn for_each_item(&self, visit: &mut ItemFn<'_, Self>) -> Result<(), EncodeError> {
        if let Value::List(items) = self {
            for item in items {
                visit(item)?;
            }
        }
        Ok(())
    }

    fn with_entries(&self, visit: &mut EntriesFn<'_, Self>) -> Result<(), EncodeError> {
        let entries = match self {
            Value::Dict(entries) => entries
                .iter()
                .map(|(k, v)| (Key::Bytes(Cow::Borrowed(k.as_slice())), v))
                .collect(),
            _ => Vec::new(),
        };
        visit(entries)
    }
}

/// JSON documents: strings carrying the
/// `data:application/octet-stream;base64,` prefix are byte strings, other
/// strings are text. `null` and non-integral numbers are unsupported.
impl Encodable for serde_json::Value {
    fn kind(&self) -> Kind<'_> {
        use serde_json::Value as Json;
        match self {
            Json::Null => Kind::Unsupported("null"),
            Json::Bool(b) => Kind::Bool(*b),
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Kind::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Kind::UInt(v)
                } else {
                    match number_to_bigint(n) {
                        Some(big) => Kind::BigInt(Cow::Owned(big)),
                        None => Kind::Unsupported("float"),
                    }
                }
            }
            Json::String(s) => match decode_binary_uri(s) {
                Some(bytes) => Kind::Bytes(Cow::Owned(bytes)),
                None => Kind::Text(s),
            },
            Json::Array(_) => Kind::List,
            Json::Object(_) => Kind::Dict,
        }
    }

    fn for_each_item(&self, visit: &mut ItemFn<'_, Self>) -> Result<(), EncodeError> {
        if let serde_json::Value::Array(items) = self {
            for item in items {
                visit(item)?;
            }
        }
        Ok(())
    }

    fn with_entries(&self, visit: &mut EntriesFn<'_, Self>) -> Result<(), EncodeError> {
        let entries = match self {
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(k, v)| match decode_binary_uri(k) {
                    Some(bytes) => (Key::Bytes(Cow::Owned(bytes)), v),
                    None => (Key::Text(k.as_str()), v),
                })
                .collect(),
            _ => Vec::new(),
        };
        visit(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_value_integers_by_lane() {
        assert_eq!(Value::from(-1).kind(), Kind::Int(-1));
        assert_eq!(Value::from(u64::MAX).kind(), Kind::UInt(u64::MAX));
        let big = Value::from(u128::MAX);
        assert_eq!(big.kind(), Kind::BigInt(Cow::Owned(BigInt::from(u128::MAX))));
    }

    #[test]
    fn classifies_json() {
        assert_eq!(json!(null).kind(), Kind::Unsupported("null"));
        assert_eq!(json!(1.5).kind(), Kind::Unsupported("float"));
        assert_eq!(json!(true).kind(), Kind::Bool(true));
        assert_eq!(json!("hi").kind(), Kind::Text("hi"));
        assert_eq!(
            json!("data:application/octet-stream;base64,AAE=").kind(),
            Kind::Bytes(Cow::Owned(vec![0, 1]))
        );
        assert_eq!(json!([]).kind(), Kind::List);
        assert_eq!(json!({}).kind(), Kind::Dict);
    }

    #[test]
    fn classifies_json_numbers_beyond_u64() {
        let big: serde_json::Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(
            big.kind(),
            Kind::BigInt(Cow::Owned(BigInt::from(u64::MAX) + 1))
        );
        let negative: serde_json::Value =
            serde_json::from_str("-9223372036854775809").unwrap();
        assert_eq!(
            negative.kind(),
            Kind::BigInt(Cow::Owned(BigInt::from(i64::MIN) - 1))
        );
        let float: serde_json::Value = serde_json::from_str("1e400").unwrap();
        assert_eq!(float.kind(), Kind::Unsupported("float"));
    }

    #[test]
    fn invalid_key_names_its_type() {
        assert_eq!(
            Key::Invalid("integer").into_bytes(),
            Err(EncodeError::InvalidKey("integer"))
        );
        assert_eq!(Key::Text("a").into_bytes().unwrap().as_ref(), b"a");
    }
}
