use thiserror::Error;

/// Errors raised while growing a [`Writer`](crate::Writer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("failed to allocate {requested} bytes for write buffer")]
    AllocFailed { requested: usize },
    #[error("write buffer capacity overflow")]
    CapacityOverflow,
}
