//! `Decoder`: canonical bencode decoder.
//!
//! Recursive descent keyed on the byte at the cursor. Anything that is not
//! the unique canonical encoding of a value is rejected, including trailing
//! bytes after the top-level value.

use std::cmp::Ordering;

use num_bigint::BigInt;
use tracing::trace;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::overflow::{self, DigitRunError};
use crate::{DecodeOptions, Dict, Integer, Value};

/// Cursor over the input. Purely local to one `decode` call.
struct Cur<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Cur<'a> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Index of the first `needle` at or after `from`.
    fn find(&self, needle: u8, from: usize) -> Option<usize> {
        self.data
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|i| from + i)
    }

    #[inline]
    fn err(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos)
    }
}

/// Stateless canonical decoder.
///
/// ```
/// use bencode_canon::{Decoder, Value};
///
/// let value = Decoder::new().decode(b"d3:bar4:spam3:fooi42ee").unwrap();
/// assert_eq!(value.get("bar").and_then(Value::as_str), Some("spam"));
/// assert_eq!(value.get("foo").and_then(Value::as_i64), Some(42));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes exactly one value spanning all of `input`.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        if input.is_empty() {
            return Err(DecodeError::new(DecodeErrorKind::EmptyInput, 0));
        }
        let mut c = Cur {
            data: input,
            pos: 0,
            depth: 0,
        };
        let value = self.read_any(&mut c)?;
        if c.pos != input.len() {
            return Err(c.err(DecodeErrorKind::TrailingBytes(input.len() - c.pos)));
        }
        trace!(len = input.len(), kind = value.kind_name(), "decoded value");
        Ok(value)
    }

    fn read_any(&self, c: &mut Cur) -> Result<Value, DecodeError> {
        match c.peek() {
            Some(b'i') => self.read_int(c).map(Value::Integer),
            Some(b'0'..=b'9') => self.read_bin(c).map(|b| Value::Bytes(b.to_vec())),
            Some(b'l') => self.read_list(c),
            Some(b'd') => self.read_dict(c),
            Some(byte) => Err(c.err(DecodeErrorKind::InvalidPrefix(byte))),
            None => Err(c.err(DecodeErrorKind::UnexpectedEnd)),
        }
    }

    /// `i` `-`? digits `e`
    fn read_int(&self, c: &mut Cur) -> Result<Integer, DecodeError> {
        let start = c.pos;
        let body = start + 1;
        let end = c
            .find(b'e', body)
            .ok_or_else(|| c.err(DecodeErrorKind::MissingIntegerTerminator))?;
        let data = c.data;
        let run = &data[body..end];
        let (negative, magnitude, digits_at) = match run {
            [b'-', rest @ ..] => (true, rest, body + 1),
            _ => (false, run, body),
        };
        let fail = |kind, offset| Err(DecodeError::new(kind, offset));
        match magnitude {
            [] => return fail(DecodeErrorKind::EmptyInteger, start),
            [b'0', ..] if negative => return fail(DecodeErrorKind::NegativeZero, body),
            [b'0', _, ..] => return fail(DecodeErrorKind::IntegerLeadingZero, body),
            _ => {}
        }

        let parsed = if negative {
            overflow::parse_negative(magnitude).map(Integer::from)
        } else {
            overflow::parse_unsigned(magnitude).map(Integer::from)
        };
        let value = match parsed {
            Ok(value) => value,
            Err(DigitRunError::Overflow) => {
                // The run is validated digits with an optional sign.
                let big = BigInt::parse_bytes(run, 10).ok_or_else(|| {
                    DecodeError::new(DecodeErrorKind::InvalidDigit(run[0]), body)
                })?;
                trace!(digits = magnitude.len(), "integer exceeds 64-bit lanes");
                Integer::from(big)
            }
            Err(DigitRunError::InvalidDigit(i)) => {
                return fail(DecodeErrorKind::InvalidDigit(magnitude[i]), digits_at + i)
            }
            Err(DigitRunError::Empty) => return fail(DecodeErrorKind::EmptyInteger, start),
        };
        c.pos = end + 1;
        Ok(value)
    }

    /// `<len>` `:` `<len bytes>`
    fn read_bin<'a>(&self, c: &mut Cur<'a>) -> Result<&'a [u8], DecodeError> {
        let start = c.pos;
        let sep = c
            .find(b':', start)
            .ok_or_else(|| c.err(DecodeErrorKind::MissingLengthSeparator))?;
        let data = c.data;
        let digits = &data[start..sep];
        if digits.len() > 1 && digits[0] == b'0' {
            return Err(c.err(DecodeErrorKind::LengthLeadingZero));
        }
        let len = match overflow::parse_unsigned(digits) {
            Ok(len) => usize::try_from(len)
                .map_err(|_| c.err(DecodeErrorKind::LengthOverflow))?,
            Err(DigitRunError::Overflow) => {
                return Err(c.err(DecodeErrorKind::LengthOverflow));
            }
            Err(DigitRunError::InvalidDigit(i)) => {
                return Err(DecodeError::new(
                    DecodeErrorKind::InvalidDigit(digits[i]),
                    start + i,
                ));
            }
            Err(DigitRunError::Empty) => {
                return Err(c.err(DecodeErrorKind::InvalidPrefix(b':')));
            }
        };
        // The body must fit after the separator: sep + len < data.len().
        if len >= data.len() - sep {
            return Err(c.err(DecodeErrorKind::TruncatedByteString(len)));
        }
        let body = sep + 1;
        c.pos = body + len;
        Ok(&data[body..c.pos])
    }

    fn enter(&self, c: &mut Cur) -> Result<(), DecodeError> {
        if c.depth >= self.options.max_depth {
            return Err(c.err(DecodeErrorKind::DepthLimitExceeded(self.options.max_depth)));
        }
        c.depth += 1;
        Ok(())
    }

    /// `l` value* `e`
    fn read_list(&self, c: &mut Cur) -> Result<Value, DecodeError> {
        let start = c.pos;
        self.enter(c)?;
        c.pos += 1;
        let mut items = Vec::new();
        loop {
            match c.peek() {
                Some(b'e') => break,
                Some(_) => items.push(self.read_any(c)?),
                None => {
                    return Err(DecodeError::new(DecodeErrorKind::UnterminatedList, start));
                }
            }
        }
        c.pos += 1;
        c.depth -= 1;
        Ok(Value::List(items))
    }

    /// `d` (key value)* `e`, keys strictly ascending.
    fn read_dict(&self, c: &mut Cur) -> Result<Value, DecodeError> {
        let start = c.pos;
        self.enter(c)?;
        c.pos += 1;
        let mut entries: Vec<(&[u8], Value)> = Vec::new();
        loop {
            let key_at = c.pos;
            match c.peek() {
                Some(b'e') => break,
                Some(b'0'..=b'9') => {}
                Some(byte) => return Err(c.err(DecodeErrorKind::InvalidKeyPrefix(byte))),
                None => {
                    return Err(DecodeError::new(DecodeErrorKind::UnterminatedDict, start));
                }
            }
            let key = self.read_bin(c)?;
            if let Some((prev, _)) = entries.last() {
                match key.cmp(prev) {
                    Ordering::Greater => {}
                    Ordering::Equal => {
                        return Err(DecodeError::new(
                            DecodeErrorKind::DuplicateKey(key.to_vec()),
                            key_at,
                        ));
                    }
                    Ordering::Less => {
                        return Err(DecodeError::new(DecodeErrorKind::KeysNotSorted, key_at));
                    }
                }
            }
            // A key with nothing after it ends in `read_any` as `UnexpectedEnd`.
            let value = self.read_any(c)?;
            entries.push((key, value));
        }
        c.pos += 1;
        c.depth -= 1;
        let dict: Dict = entries
            .into_iter()
            .map(|(k, v)| (k.to_vec(), v))
            .collect();
        Ok(Value::Dict(dict))
    }
}
