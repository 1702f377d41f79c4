//! Canonical bencode codec.
//!
//! Bencode has four value kinds: integers (`i42e`), byte strings
//! (`4:spam`), lists (`l…e`) and dictionaries (`d…e`) with keys sorted by
//! raw bytes. This crate decodes only the canonical encoding of a value and
//! always produces it when encoding:
//!
//! - [`Decoder`] rejects leading zeros, `-0`, unsorted or duplicate keys and
//!   trailing bytes, reporting the offending byte offset.
//! - [`Encoder`] sorts dictionary keys, rejects duplicates and cyclic native
//!   graphs, and reuses output buffers through a bounded pool.
//! - Integers beyond the 64-bit lanes fall back to [`num_bigint::BigInt`].
//!
//! ```
//! use bencode_canon::{decode, encode, Value};
//!
//! let value = Value::list([1, 2, 3]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes, b"li1ei2ei3ee");
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

mod decoder;
mod encoder;
mod error;
mod integer;
mod options;
mod value;

pub mod cli;
pub mod json;
pub mod native;
pub mod overflow;

pub use bencode_buffers::{BufferError, PoolOptions, Writer, WriterPool};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use integer::Integer;
pub use native::{Encodable, Key, Kind};
pub use options::{BoolPolicy, DecodeOptions, EncodeOptions, DEFAULT_MAX_DEPTH};
pub use value::{Dict, Value};

/// Decodes `input` with default options.
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(input)
}

/// Encodes `value` with default options.
pub fn encode<T: Encodable>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value)
}
