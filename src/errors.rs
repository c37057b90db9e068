//! Error types for the leasing layer

use std::time::Duration;

use thiserror::Error;

use crate::value::ParamKind;

/// Errors raised at the pool boundary
#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("Pool is empty - no instances available")]
    Empty,

    #[error("Pool is at capacity - instance cannot be returned")]
    Full,

    #[error("Allocation timed out after {0:?}")]
    Timeout(Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Failure propagated unchanged from a delegated operation
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the lease handler
#[derive(Error, Debug)]
pub enum LeaseError {
    /// The resource type has no operation matching the requested signature.
    /// Fatal to the call; the lease slot is left as it was.
    #[error("No operation `{name}` matching parameter types {params:?}")]
    NoSuchOperation {
        name: String,
        params: Vec<ParamKind>,
    },

    /// The pool could not supply an instance; the lease slot stays empty.
    #[error("Failed to allocate an instance from the pool")]
    Allocation(#[source] PoolError),

    /// A stale instance could not be returned to the pool. The slot is
    /// cleared first, so the instance is never reused afterwards.
    #[error("Failed to return a stale instance to the pool")]
    Invalidation(#[source] PoolError),

    /// The delegated operation itself failed.
    #[error(transparent)]
    Operation(BoxedError),
}

pub type LeaseResult<T> = Result<T, LeaseError>;
