//! `Encoder`: canonical bencode encoder.
//!
//! Wire format:
//! - Integer: `i<decimal>e`          e.g. `i42e`, `i-7e`
//! - String:  `<byte_len>:<bytes>`   e.g. `5:hello`
//! - List:    `l<items>e`
//! - Dict:    `d<key-value pairs sorted by raw key bytes>e`

use std::borrow::Cow;
use std::collections::HashSet;

use bencode_buffers::{Writer, WriterPool};
use num_bigint::BigInt;
use tracing::trace;

use crate::error::EncodeError;
use crate::native::{Encodable, Kind};
use crate::{BoolPolicy, EncodeOptions};

/// Canonical encoder.
///
/// Holds a pool of output buffers reused across calls; everything else is
/// per call, so one encoder can be shared between threads.
///
/// ```
/// use bencode_canon::{Encoder, Value};
///
/// let encoder = Encoder::new();
/// let value = Value::dict([("foo", Value::from(42)), ("bar", Value::from("spam"))]);
/// assert_eq!(encoder.encode(&value).unwrap(), b"d3:bar4:spam3:fooi42ee");
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    options: EncodeOptions,
    pool: WriterPool,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            options,
            pool: WriterPool::new(options.pool),
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn pool(&self) -> &WriterPool {
        &self.pool
    }

    /// Encodes `value` into a fresh byte vector.
    pub fn encode<T: Encodable>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let mut writer = self.pool.acquire();
        self.encode_into(&mut writer, value)?;
        trace!(len = writer.len(), "encoded value");
        Ok(writer.as_slice().to_vec())
    }

    /// Appends the encoding of `value` to `writer`.
    ///
    /// On error the writer is truncated back to its length before the call.
    pub fn encode_into<T: Encodable>(
        &self,
        writer: &mut Writer,
        value: &T,
    ) -> Result<(), EncodeError> {
        let mark = writer.len();
        let mut session = Session {
            writer: &mut *writer,
            options: &self.options,
            in_progress: HashSet::new(),
            depth: 0,
        };
        let result = session.write_any(value);
        if result.is_err() {
            writer.truncate(mark);
        }
        result
    }
}

/// State of one encode call: output, composites on the current path, depth.
struct Session<'w> {
    writer: &'w mut Writer,
    options: &'w EncodeOptions,
    in_progress: HashSet<usize>,
    depth: usize,
}

impl Session<'_> {
    fn write_any<T: Encodable>(&mut self, value: &T) -> Result<(), EncodeError> {
        match value.kind() {
            Kind::Bool(b) => self.write_boolean(b),
            Kind::Int(int) => self.write_integer(int),
            Kind::UInt(uint) => self.write_u_integer(uint),
            Kind::BigInt(int) => self.write_big_int(&int),
            Kind::Bytes(buf) => self.write_bin(&buf),
            Kind::Text(s) => self.write_bin(s.as_bytes()),
            Kind::List => self.write_composite(value, Self::write_arr),
            Kind::Dict => self.write_composite(value, Self::write_obj),
            Kind::Unsupported(name) => Err(EncodeError::Unsupported(name)),
        }
    }

    /// Runs `body` with `value` registered as in progress.
    fn write_composite<T: Encodable>(
        &mut self,
        value: &T,
        body: fn(&mut Self, &T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        let id = value.identity();
        if !self.in_progress.insert(id) {
            return Err(EncodeError::CircularReference);
        }
        if self.depth >= self.options.max_depth {
            self.in_progress.remove(&id);
            return Err(EncodeError::DepthLimitExceeded(self.options.max_depth));
        }
        self.depth += 1;
        let result = body(self, value);
        self.depth -= 1;
        self.in_progress.remove(&id);
        result
    }

    fn write_boolean(&mut self, b: bool) -> Result<(), EncodeError> {
        match self.options.bools {
            BoolPolicy::AsInteger => self.write_integer(i64::from(b)),
            BoolPolicy::Reject => Err(EncodeError::BoolRejected),
        }
    }

    fn write_integer(&mut self, int: i64) -> Result<(), EncodeError> {
        self.writer.u8(b'i')?;
        self.writer.i64(int)?;
        self.writer.u8(b'e')?;
        Ok(())
    }

    fn write_u_integer(&mut self, uint: u64) -> Result<(), EncodeError> {
        self.writer.u8(b'i')?;
        self.writer.u64(uint)?;
        self.writer.u8(b'e')?;
        Ok(())
    }

    fn write_big_int(&mut self, int: &BigInt) -> Result<(), EncodeError> {
        self.writer.u8(b'i')?;
        self.writer.ascii(&int.to_str_radix(10))?;
        self.writer.u8(b'e')?;
        Ok(())
    }

    fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        self.writer.usize(buf.len())?;
        self.writer.u8(b':')?;
        self.writer.buf(buf)?;
        Ok(())
    }

    fn write_arr<T: Encodable>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.writer.u8(b'l')?;
        value.for_each_item(&mut |item| self.write_any(item))?;
        self.writer.u8(b'e')?;
        Ok(())
    }

    fn write_obj<T: Encodable>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.with_entries(&mut |entries| {
            if entries.is_empty() {
                self.writer.ascii("de")?;
                return Ok(());
            }
            let mut pairs: Vec<(Cow<'_, [u8]>, &T)> = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                pairs.push((key.into_bytes()?, item));
            }
            pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            if let Some(dup) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(EncodeError::DuplicateKey(dup[0].0.to_vec()));
            }
            self.writer.u8(b'd')?;
            for (key, item) in &pairs {
                self.write_bin(key)?;
                self.write_any(*item)?;
            }
            self.writer.u8(b'e')?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use serde_json::json;

    fn enc<T: Encodable>(value: &T) -> Result<Vec<u8>, EncodeError> {
        Encoder::new().encode(value)
    }

    #[test]
    fn scalars() {
        assert_eq!(enc(&Value::from(42)).unwrap(), b"i42e");
        assert_eq!(enc(&Value::from(-3)).unwrap(), b"i-3e");
        assert_eq!(enc(&Value::from(0)).unwrap(), b"i0e");
        assert_eq!(enc(&Value::from("")).unwrap(), b"0:");
        assert_eq!(enc(&Value::from("ThisIsAString")).unwrap(), b"13:ThisIsAString");
        assert_eq!(
            enc(&Value::from(u64::MAX)).unwrap(),
            b"i18446744073709551615e"
        );
    }

    #[test]
    fn big_integers() {
        assert_eq!(
            enc(&Value::from(u128::from(u64::MAX) + 1)).unwrap(),
            b"i18446744073709551616e"
        );
        assert_eq!(
            enc(&Value::from(i128::from(i64::MIN) - 1)).unwrap(),
            b"i-9223372036854775809e"
        );
    }

    #[test]
    fn empty_composites_short_circuit() {
        assert_eq!(enc(&Value::Dict(Default::default())).unwrap(), b"de");
        assert_eq!(enc(&Value::List(vec![])).unwrap(), b"le");
        assert_eq!(enc(&json!({})).unwrap(), b"de");
        assert_eq!(enc(&json!([])).unwrap(), b"le");
    }

    #[test]
    fn text_and_binary_keys_collide() {
        let value = json!({
            "k": 1,
            "data:application/octet-stream;base64,aw==": 2,
        });
        assert_eq!(enc(&value), Err(EncodeError::DuplicateKey(b"k".to_vec())));
    }

    #[test]
    fn bool_policy() {
        assert_eq!(enc(&json!([true, false])).unwrap(), b"li1ei0ee");
        let strict = Encoder::with_options(EncodeOptions::default().with_bools(BoolPolicy::Reject));
        assert_eq!(strict.encode(&json!(true)), Err(EncodeError::BoolRejected));
    }

    #[test]
    fn unsupported_names_type() {
        assert_eq!(enc(&json!(null)), Err(EncodeError::Unsupported("null")));
        assert_eq!(enc(&json!([1.5])), Err(EncodeError::Unsupported("float")));
    }

    #[test]
    fn depth_limit() {
        let encoder = Encoder::with_options(EncodeOptions::default().with_max_depth(2));
        assert_eq!(encoder.encode(&json!([[]])).unwrap(), b"llee");
        assert_eq!(
            encoder.encode(&json!([[[]]])),
            Err(EncodeError::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn encode_into_truncates_on_error() {
        let encoder = Encoder::new();
        let mut writer = Writer::new();
        encoder.encode_into(&mut writer, &json!("ok")).unwrap();
        let err = encoder.encode_into(&mut writer, &json!([1, 2, null]));
        assert_eq!(err, Err(EncodeError::Unsupported("null")));
        assert_eq!(writer.as_slice(), b"2:ok");
    }

    #[test]
    fn releases_writer_to_pool() {
        let encoder = Encoder::new();
        encoder.encode(&Value::from(1)).unwrap();
        assert_eq!(encoder.pool().idle(), 1);
        encoder.encode(&json!(null)).unwrap_err();
        assert_eq!(encoder.pool().idle(), 1);
    }
}
