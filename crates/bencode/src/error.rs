//! Decode and encode error types.

use bencode_buffers::BufferError;
use thiserror::Error;

/// A decode failure and the byte offset it was detected at.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} (offset {offset})")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub offset: usize,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("can't decode empty input")]
    EmptyInput,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid prefix byte 0x{0:02x}")]
    InvalidPrefix(u8),
    #[error("invalid int, missing 'e'")]
    MissingIntegerTerminator,
    #[error("invalid int, no digits")]
    EmptyInteger,
    #[error("invalid leading '-0'")]
    NegativeZero,
    #[error("invalid int, non-zero int should not start with '0'")]
    IntegerLeadingZero,
    #[error("invalid digit 0x{0:02x}")]
    InvalidDigit(u8),
    #[error("invalid byte string, missing ':'")]
    MissingLengthSeparator,
    #[error("invalid byte string length, non-zero length should not start with '0'")]
    LengthLeadingZero,
    #[error("byte string length overflow")]
    LengthOverflow,
    #[error("byte string length {0} exceeds remaining input")]
    TruncatedByteString(usize),
    #[error("input ended before list terminator")]
    UnterminatedList,
    #[error("input ended before dictionary terminator")]
    UnterminatedDict,
    #[error("dictionary key must be a byte string, found prefix 0x{0:02x}")]
    InvalidKeyPrefix(u8),
    #[error("keys not sorted")]
    KeysNotSorted,
    #[error("duplicate key {:?}", String::from_utf8_lossy(.0))]
    DuplicateKey(Vec<u8>),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// An encode failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("dictionary keys must be byte strings, found {0}")]
    InvalidKey(&'static str),
    #[error("duplicate dictionary key {:?}", String::from_utf8_lossy(.0))]
    DuplicateKey(Vec<u8>),
    #[error("circular reference found")]
    CircularReference,
    #[error("unsupported value of type {0}")]
    Unsupported(&'static str),
    #[error("booleans are rejected by the encoder's bool policy")]
    BoolRejected,
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
