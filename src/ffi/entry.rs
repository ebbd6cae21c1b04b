//! `.Call` entry points and the package init hook.

use super::boundary::{contain, Outcome};
use crate::bridge;
use crate::host::r::{sys, DllInfo, RHost, RRegistrar, SEXP};
use crate::registry::{
    register_entry_points, CallMethodDef, CallTable, DlFunc, RegistrationConfig, ADD_F, LLC_F,
};
use crate::routine::RoutineSet;

type CallFn2 = unsafe extern "C" fn(SEXP, SEXP) -> SEXP;
type CallFn3 = unsafe extern "C" fn(SEXP, SEXP, SEXP) -> SEXP;

const fn erase2(f: CallFn2) -> DlFunc {
    unsafe { std::mem::transmute::<CallFn2, DlFunc>(f) }
}

const fn erase3(f: CallFn3) -> DlFunc {
    unsafe { std::mem::transmute::<CallFn3, DlFunc>(f) }
}

/// Routine table handed to `R_registerRoutines`.
pub static CALL_ENTRIES: CallTable<3> = CallTable::new([
    CallMethodDef::bind(LLC_F, erase3(c_llc_f)),
    CallMethodDef::bind(ADD_F, erase2(c_add_f)),
    CallMethodDef::END,
]);

/// Return the value, or raise an R error carrying the message.
///
/// Only `Copy` data is live here, so R's longjmp skips no destructors.
unsafe fn finish(outcome: Outcome<SEXP>) -> SEXP {
    match outcome {
        Outcome::Value(value) => value,
        Outcome::Raise(message) => sys::Rf_error(c"%s".as_ptr(), message.as_ptr()),
    }
}

/// `.Call("c_llc_f", x, l, a)`.
///
/// # Safety
/// Called by R with live `REALSXP` arguments. `l` and `a` must hold at
/// least one element each; this is not checked.
#[no_mangle]
pub unsafe extern "C" fn c_llc_f(x: SEXP, l: SEXP, a: SEXP) -> SEXP {
    let routines = RoutineSet::linked();
    let outcome = contain("c_llc_f", || {
        let host = RHost::new();
        bridge::invoke_unary_scalar_with_parameters(&host, routines.unary, x, l, a)
    });
    finish(outcome)
}

/// `.Call("c_add_f", a, b)`.
///
/// # Safety
/// Called by R with live `REALSXP` arguments holding at least one element
/// each; this is not checked.
#[no_mangle]
pub unsafe extern "C" fn c_add_f(a: SEXP, b: SEXP) -> SEXP {
    let routines = RoutineSet::linked();
    let outcome = contain("c_add_f", || {
        let host = RHost::new();
        bridge::invoke_binary_scalar(&host, routines.binary, a, b)
    });
    finish(outcome)
}

/// Package init hook, run once by R when `fortloop.so` is loaded.
///
/// # Safety
/// `dll` must be the pointer R passes to the init hook.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn R_init_fortloop(dll: *mut DllInfo) {
    let mut registrar = RRegistrar::new(dll);
    register_entry_points(&mut registrar, &CALL_ENTRIES, &RegistrationConfig::default());
}
