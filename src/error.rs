//! Error types for map operations and configuration.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failures surfaced by [`HashMap`](crate::HashMap) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// No live slot records the digest of the requested key.
    #[error("no such key-value pair (digest {digest:#x})")]
    KeyNotFound { digest: u64 },

    /// Replacement storage could not be acquired while growing. The map
    /// keeps its previous regions and is unchanged.
    #[error("failed to allocate {requested} slots for relocation")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Rejected [`MapConfig`](crate::MapConfig) parameters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial capacity must be non-zero")]
    ZeroCapacity,

    #[error("headroom {headroom} must be smaller than initial capacity {initial_capacity}")]
    HeadroomTooLarge {
        headroom: usize,
        initial_capacity: usize,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;
