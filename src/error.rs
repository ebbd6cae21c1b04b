//! Error types for the bridge and host layers.

use crate::host::VectorType;
use thiserror::Error;

/// Failures reported by a [`Host`](crate::host::Host) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host refused to allocate another container.
    #[error("allocation limit of {limit} containers reached")]
    AllocationLimit { limit: usize },

    /// The host raised an error while allocating.
    #[error("host failed to allocate a vector of {len} elements")]
    AllocationFailed { len: usize },

    /// A value whose storage is not the element type the routine reads.
    #[error("expected a {expected} vector, found {found}")]
    WrongType {
        expected: VectorType,
        found: VectorType,
    },

    /// The requested length cannot be represented by the host.
    #[error("cannot allocate a vector of {len} elements")]
    TooLarge { len: usize },

    /// A value handle that this host never produced.
    #[error("unknown host value #{0}")]
    UnknownValue(usize),
}

/// Errors surfaced by the bridge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Propagated unchanged from the host.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The vector is longer than the routine's `int` element count can express.
    #[error("vector of {len} elements exceeds the routine's element-count range")]
    LengthOverflow { len: usize },
}
