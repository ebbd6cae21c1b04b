//! Host runtime abstraction.
//!
//! A host owns boxed numeric vectors and runs a collector over them. The
//! bridge only needs a handful of primitives from it: allocate a real
//! vector, read its length, borrow its storage, and protect a fresh
//! allocation from collection until it is handed back.

pub mod guard;
pub mod memory;
#[cfg(feature = "r")]
pub mod r;

pub use guard::ProtectGuard;
pub use memory::{Handle, HostStats, MemoryHost, MemoryHostConfig};

use crate::error::HostError;
use std::fmt;

/// Element type of a host vector, numbered as R's `SEXPTYPE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorType {
    Logical,
    Integer,
    Double,
    Complex,
    Character,
    List,
    Other(u32),
}

impl VectorType {
    /// Map a `SEXPTYPE` code.
    pub fn from_sexptype(code: u32) -> Self {
        match code {
            10 => VectorType::Logical,
            13 => VectorType::Integer,
            14 => VectorType::Double,
            15 => VectorType::Complex,
            16 => VectorType::Character,
            19 => VectorType::List,
            other => VectorType::Other(other),
        }
    }

    /// R's name for the type, as `typeof()` prints it.
    pub fn name(&self) -> &'static str {
        match self {
            VectorType::Logical => "logical",
            VectorType::Integer => "integer",
            VectorType::Double => "double",
            VectorType::Complex => "complex",
            VectorType::Character => "character",
            VectorType::List => "list",
            VectorType::Other(_) => "non-vector",
        }
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The boxed-value protocol of a garbage-collected host runtime.
pub trait Host {
    /// Handle to a host-owned value.
    type Value: Copy + std::fmt::Debug;

    /// Allocate a new real (double precision) vector of `len` elements.
    fn alloc_real(&self, len: usize) -> Result<Self::Value, HostError>;

    /// Logical element count of `value`, from the host's own metadata.
    fn length(&self, value: Self::Value) -> Result<usize, HostError>;

    /// Raw pointer to the first element of `value`'s storage.
    ///
    /// Fails with [`HostError::WrongType`] unless `value` is a double
    /// vector. The pointer stays valid while the value is reachable by the
    /// host and must not be retained past the current call.
    fn real_ptr(&self, value: Self::Value) -> Result<*mut f64, HostError>;

    /// Push `value` onto the host's protection stack.
    fn protect(&self, value: Self::Value);

    /// Pop `count` entries from the protection stack.
    fn unprotect(&self, count: usize);
}
