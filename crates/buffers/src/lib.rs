//! Output buffers for the canonical bencode codec.
//!
//! - [`Writer`]: append-only byte buffer with geometric growth.
//! - [`WriterPool`]: bounded, thread-safe pool of reusable writers.

mod error;
mod pool;
mod writer;

pub use error::BufferError;
pub use pool::{PoolOptions, PooledWriter, WriterPool};
pub use writer::{Writer, DEFAULT_CAPACITY};
