//! Core logic behind the `bencode-encode` and `bencode-decode` binaries.
//!
//! - `bencode-encode`: JSON on stdin → canonical bencode on stdout
//! - `bencode-decode`: bencode on stdin → pretty JSON on stdout

use thiserror::Error;

use crate::json::to_json;
use crate::{DecodeError, DecodeOptions, Decoder, EncodeError, EncodeOptions, Encoder};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Encodes a JSON document as canonical bencode.
pub fn pack(json: &str, options: EncodeOptions) -> Result<Vec<u8>, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let encoder = Encoder::with_options(options);
    Ok(encoder.encode(&value)?)
}

/// Decodes bencode bytes into a pretty-printed JSON document.
pub fn unpack(bytes: &[u8], options: DecodeOptions) -> Result<String, CliError> {
    let value = Decoder::with_options(options).decode(bytes)?;
    Ok(serde_json::to_string_pretty(&to_json(&value))?)
}

/// Installs the stderr log subscriber used by the binaries, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
