//! External numeric routines.
//!
//! The routines themselves live outside this crate (compiled Fortran in the
//! R package). The bridge only knows their calling convention: raw input
//! pointers, an element count passed by value, and a trailing out-pointer
//! the routine writes its single result through.

#[cfg(feature = "r")]
mod linked;

use libc::c_int;

/// `add_f(a, b, ret)`: two scalar inputs, result written to `ret`.
pub type BinaryRoutine = unsafe extern "C" fn(a: *const f64, b: *const f64, ret: *mut f64);

/// `llc_f(x, n, l, a, ret)`: `n` elements at `x`, two scalar parameters,
/// result written to `ret`.
pub type UnaryRoutine =
    unsafe extern "C" fn(x: *const f64, n: c_int, l: *const f64, a: *const f64, ret: *mut f64);

/// The pair of routines the bridge dispatches to.
#[derive(Clone, Copy, Debug)]
pub struct RoutineSet {
    pub unary: UnaryRoutine,
    pub binary: BinaryRoutine,
}

impl RoutineSet {
    /// Bundle two routines.
    pub fn new(unary: UnaryRoutine, binary: BinaryRoutine) -> Self {
        Self { unary, binary }
    }
}
