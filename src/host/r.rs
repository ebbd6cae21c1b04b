//! The R C API behind [`Host`] and [`Registrar`].
//!
//! No method here lets R raise an error across a Rust frame that owns
//! anything: argument types are checked before `REAL` is reached, and
//! allocation runs in its own top-level context.

use super::{Host, VectorType};
use crate::error::HostError;
use crate::registry::{CallMethodDef, Registrar};
use libc::c_void;
use std::marker::PhantomData;

/// Raw declarations from `Rinternals.h` and `R_ext/Rdynload.h`.
#[allow(non_camel_case_types, non_snake_case)]
pub mod sys {
    use crate::registry::CallMethodDef;
    use libc::{c_char, c_int, c_uint, c_void};

    /// Opaque R object.
    #[repr(C)]
    pub struct SEXPREC {
        _private: [u8; 0],
    }

    /// Pointer to an R object.
    pub type SEXP = *mut SEXPREC;

    /// Opaque shared-object record handed to `R_init_<pkg>`.
    #[repr(C)]
    pub struct DllInfo {
        _private: [u8; 0],
    }

    pub type SEXPTYPE = c_uint;
    pub type R_xlen_t = isize;
    /// `Rboolean` is a C enum: `FALSE = 0`, `TRUE = 1`.
    pub type Rboolean = c_int;

    pub const REALSXP: SEXPTYPE = 14;
    pub const FALSE: Rboolean = 0;
    pub const TRUE: Rboolean = 1;

    extern "C" {
        pub fn Rf_allocVector(sexptype: SEXPTYPE, len: R_xlen_t) -> SEXP;
        pub fn Rf_xlength(x: SEXP) -> R_xlen_t;
        pub fn TYPEOF(x: SEXP) -> c_int;
        pub fn REAL(x: SEXP) -> *mut f64;
        pub fn Rf_protect(x: SEXP) -> SEXP;
        pub fn Rf_unprotect(count: c_int);
        pub fn Rf_error(format: *const c_char, ...) -> !;
        pub fn R_ToplevelExec(fun: unsafe extern "C" fn(data: *mut c_void), data: *mut c_void)
            -> Rboolean;

        pub fn R_registerRoutines(
            info: *mut DllInfo,
            c_routines: *const c_void,
            call_routines: *const CallMethodDef,
            fortran_routines: *const c_void,
            external_routines: *const c_void,
        ) -> c_int;
        pub fn R_useDynamicSymbols(info: *mut DllInfo, value: Rboolean) -> Rboolean;
        pub fn R_forceSymbols(info: *mut DllInfo, value: Rboolean) -> Rboolean;
    }
}

pub use sys::{DllInfo, SEXP};

/// R's allocator and protection stack.
///
/// Not `Send`: R may only be entered from its main thread.
pub struct RHost {
    _main_thread: PhantomData<*const ()>,
}

impl RHost {
    /// # Safety
    /// Must only be used on R's main thread, from inside a native call that
    /// R dispatched. Every value passed to the trait methods must be a live
    /// `SEXP`.
    pub unsafe fn new() -> Self {
        Self {
            _main_thread: PhantomData,
        }
    }
}

impl Host for RHost {
    type Value = SEXP;

    fn alloc_real(&self, len: usize) -> Result<SEXP, HostError> {
        let xlen = sys::R_xlen_t::try_from(len).map_err(|_| HostError::TooLarge { len })?;
        let mut request = AllocRequest {
            len: xlen,
            result: std::ptr::null_mut(),
        };

        // An allocation error jumps to the top-level context R_ToplevelExec
        // sets up, leaving only `alloc_in_toplevel` behind.
        let completed = unsafe {
            sys::R_ToplevelExec(alloc_in_toplevel, (&mut request as *mut AllocRequest).cast())
        };
        if completed == sys::FALSE || request.result.is_null() {
            return Err(HostError::AllocationFailed { len });
        }
        Ok(request.result)
    }

    fn length(&self, value: SEXP) -> Result<usize, HostError> {
        Ok(unsafe { sys::Rf_xlength(value) }.max(0) as usize)
    }

    fn real_ptr(&self, value: SEXP) -> Result<*mut f64, HostError> {
        // REAL() raises an R error on anything but a double vector.
        let found = VectorType::from_sexptype(unsafe { sys::TYPEOF(value) } as u32);
        if found != VectorType::Double {
            return Err(HostError::WrongType {
                expected: VectorType::Double,
                found,
            });
        }
        Ok(unsafe { sys::REAL(value) })
    }

    fn protect(&self, value: SEXP) {
        unsafe {
            sys::Rf_protect(value);
        }
    }

    fn unprotect(&self, count: usize) {
        unsafe { sys::Rf_unprotect(count as libc::c_int) }
    }
}

struct AllocRequest {
    len: sys::R_xlen_t,
    result: SEXP,
}

unsafe extern "C" fn alloc_in_toplevel(data: *mut c_void) {
    let request = &mut *data.cast::<AllocRequest>();
    request.result = sys::Rf_allocVector(sys::REALSXP, request.len);
}

/// Registers routines against the `DllInfo` R passes to `R_init_<pkg>`.
pub struct RRegistrar {
    dll: *mut DllInfo,
}

impl RRegistrar {
    /// # Safety
    /// `dll` must be the pointer R passed to the package's init hook.
    pub unsafe fn new(dll: *mut DllInfo) -> Self {
        Self { dll }
    }
}

impl Registrar for RRegistrar {
    fn register_call_routines(&mut self, table: &'static [CallMethodDef]) {
        unsafe {
            sys::R_registerRoutines(
                self.dll,
                std::ptr::null(),
                table.as_ptr(),
                std::ptr::null(),
                std::ptr::null(),
            );
        }
    }

    fn use_dynamic_symbols(&mut self, enabled: bool) {
        unsafe {
            sys::R_useDynamicSymbols(self.dll, if enabled { sys::TRUE } else { sys::FALSE });
        }
    }

    fn force_symbols(&mut self, enabled: bool) {
        unsafe {
            sys::R_forceSymbols(self.dll, if enabled { sys::TRUE } else { sys::FALSE });
        }
    }
}
