//! In-process host with an instrumented protection stack.
//!
//! `MemoryHost` behaves like a single-threaded collected runtime as far as
//! the bridge can observe: values are length-tagged `f64` buffers addressed
//! by handle, and every allocation and protect/unprotect is counted. Tests
//! and benches run the bridge against it.

use super::{Host, VectorType};
use crate::error::HostError;
use std::cell::{Cell, RefCell};

/// Configuration for a [`MemoryHost`].
#[derive(Clone, Debug, Default)]
pub struct MemoryHostConfig {
    /// Maximum number of containers the host will allocate (None = unlimited).
    pub max_allocations: Option<usize>,
}

/// Handle to a vector owned by a [`MemoryHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    /// Slot index inside the owning host.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Allocation and protection counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Containers allocated so far.
    pub allocations: usize,
    /// Total protect calls.
    pub protects: usize,
    /// Total entries popped by unprotect calls.
    pub unprotects: usize,
    /// Current protection stack depth.
    pub depth: usize,
    /// Deepest the protection stack has been.
    pub max_depth: usize,
    /// Unprotect requests that exceeded the stack depth.
    pub underflows: usize,
}

/// Storage of one host vector.
enum Slot {
    Double(Vec<f64>),
    Integer(Vec<i32>),
}

impl Slot {
    fn len(&self) -> usize {
        match self {
            Slot::Double(v) => v.len(),
            Slot::Integer(v) => v.len(),
        }
    }

    fn vector_type(&self) -> VectorType {
        match self {
            Slot::Double(_) => VectorType::Double,
            Slot::Integer(_) => VectorType::Integer,
        }
    }
}

/// Single-threaded in-memory host.
pub struct MemoryHost {
    config: MemoryHostConfig,
    vectors: RefCell<Vec<Slot>>,
    protect_stack: RefCell<Vec<Handle>>,
    stats: Cell<HostStats>,
}

impl MemoryHost {
    /// Create a host with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryHostConfig::default())
    }

    /// Create a host with the given configuration.
    pub fn with_config(config: MemoryHostConfig) -> Self {
        Self {
            config,
            vectors: RefCell::new(Vec::new()),
            protect_stack: RefCell::new(Vec::new()),
            stats: Cell::new(HostStats::default()),
        }
    }

    /// Allocate a vector holding a copy of `values`.
    pub fn vector(&self, values: &[f64]) -> Result<Handle, HostError> {
        self.push(Slot::Double(values.to_vec()))
    }

    /// Allocate an integer vector holding a copy of `values`.
    pub fn integer(&self, values: &[i32]) -> Result<Handle, HostError> {
        self.push(Slot::Integer(values.to_vec()))
    }

    /// Allocate a length-1 vector.
    pub fn scalar(&self, value: f64) -> Result<Handle, HostError> {
        self.vector(&[value])
    }

    /// Copy out the contents of a double vector.
    pub fn read(&self, handle: Handle) -> Result<Vec<f64>, HostError> {
        match self.vectors.borrow().get(handle.0) {
            Some(Slot::Double(v)) => Ok(v.clone()),
            Some(other) => Err(HostError::WrongType {
                expected: VectorType::Double,
                found: other.vector_type(),
            }),
            None => Err(HostError::UnknownValue(handle.0)),
        }
    }

    /// First element of `handle`.
    pub fn read_scalar(&self, handle: Handle) -> Result<f64, HostError> {
        self.read(handle)?
            .first()
            .copied()
            .ok_or(HostError::UnknownValue(handle.0))
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> HostStats {
        self.stats.get()
    }

    /// Values currently on the protection stack, bottom first.
    pub fn protected(&self) -> Vec<Handle> {
        self.protect_stack.borrow().clone()
    }

    fn push(&self, slot: Slot) -> Result<Handle, HostError> {
        let mut vectors = self.vectors.borrow_mut();
        if let Some(limit) = self.config.max_allocations {
            if vectors.len() >= limit {
                return Err(HostError::AllocationLimit { limit });
            }
        }

        vectors.push(slot);
        self.update(|s| s.allocations += 1);
        Ok(Handle(vectors.len() - 1))
    }

    fn update(&self, f: impl FnOnce(&mut HostStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    type Value = Handle;

    fn alloc_real(&self, len: usize) -> Result<Handle, HostError> {
        self.push(Slot::Double(vec![0.0; len]))
    }

    fn length(&self, value: Handle) -> Result<usize, HostError> {
        self.vectors
            .borrow()
            .get(value.0)
            .map(Slot::len)
            .ok_or(HostError::UnknownValue(value.0))
    }

    fn real_ptr(&self, value: Handle) -> Result<*mut f64, HostError> {
        // Inner buffers never move once allocated, only the outer Vec grows.
        match self.vectors.borrow_mut().get_mut(value.0) {
            Some(Slot::Double(v)) => Ok(v.as_mut_ptr()),
            Some(other) => Err(HostError::WrongType {
                expected: VectorType::Double,
                found: other.vector_type(),
            }),
            None => Err(HostError::UnknownValue(value.0)),
        }
    }

    fn protect(&self, value: Handle) {
        let mut stack = self.protect_stack.borrow_mut();
        stack.push(value);
        let depth = stack.len();
        self.update(|s| {
            s.protects += 1;
            s.depth = depth;
            s.max_depth = s.max_depth.max(depth);
        });
    }

    fn unprotect(&self, count: usize) {
        let mut stack = self.protect_stack.borrow_mut();
        let popped = count.min(stack.len());
        let remaining = stack.len() - popped;
        stack.truncate(remaining);
        self.update(|s| {
            s.unprotects += popped;
            s.depth = remaining;
            if popped < count {
                s.underflows += 1;
            }
        });
    }
}
