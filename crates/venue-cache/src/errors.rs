use thiserror::Error;

/// Errors raised by a cache store or by the facade around it.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(String),

    #[error("cache operation timed out after {0}ms")]
    Timeout(u64),

    /// The detached producer task ended without reporting an outcome.
    #[error("cache producer task aborted: {0}")]
    ProducerAborted(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
