//! Error types shared by the collections and the registry.

use thiserror::Error;

/// Caller contract violations and internal corruption detected by the collections.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CollectionError {
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot operate on empty collection")]
    EmptyCollection,

    #[error("collection cannot be modified during enumeration")]
    InvalidEnumeration,

    /// A bucket chain visited more links than the table holds entries.
    #[error("concurrent operation is unsupported")]
    ConcurrentOperation,

    #[error("attempted to add duplicate key")]
    DuplicateKey,

    #[error("key not found")]
    KeyNotFound,

    #[error("capacity {capacity} is smaller than the current count {count}")]
    CapacityBelowCount { capacity: usize, count: usize },

    #[error("range of {count} elements at {index} is invalid for length {len}")]
    InvalidRange {
        index: usize,
        count: usize,
        len: usize,
    },
}

pub type Result<T, E = CollectionError> = core::result::Result<T, E>;

/// Non-fatal misuse reported by [`PrefabRegistry::return_worker`](crate::PrefabRegistry::return_worker).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ReturnError {
    /// The worker was never rented from this registry, or was already returned.
    #[error("unknown worker returned to registry")]
    UnknownWorker,
}

#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(CollectionError::IndexOutOfRange { index, len })
    }
}
