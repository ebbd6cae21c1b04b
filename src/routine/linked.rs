//! Routines linked from the package's compiled Fortran sources.

use super::RoutineSet;
use libc::c_int;

extern "C" {
    fn llc_f_(x: *const f64, n: c_int, l: *const f64, a: *const f64, ret: *mut f64);
    fn add_f_(a: *const f64, b: *const f64, ret: *mut f64);
}

impl RoutineSet {
    /// The routines the package links in.
    pub fn linked() -> Self {
        Self::new(llc_f_, add_f_)
    }
}
