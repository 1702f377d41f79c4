//! Decoder and encoder configuration.

use bencode_buffers::PoolOptions;

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest allowed nesting of lists and dictionaries.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// How the encoder treats native boolean values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolPolicy {
    /// `true` as `i1e`, `false` as `i0e`.
    #[default]
    AsInteger,
    /// Fail with [`EncodeError::BoolRejected`](crate::EncodeError::BoolRejected).
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Deepest allowed nesting of lists and dictionaries.
    pub max_depth: usize,
    pub bools: BoolPolicy,
    /// Sizing of the encoder's writer pool.
    pub pool: PoolOptions,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            bools: BoolPolicy::default(),
            pool: PoolOptions::default(),
        }
    }
}

impl EncodeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_bools(mut self, bools: BoolPolicy) -> Self {
        self.bools = bools;
        self
    }

    pub fn with_pool(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }
}
