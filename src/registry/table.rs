//! Null-terminated `.Call` routine table.

use libc::{c_char, c_int, c_void};
use std::ffi::CStr;

/// Type-erased native function pointer, as in R's `DL_FUNC`.
pub type DlFunc = unsafe extern "C" fn() -> *mut c_void;

/// An exported routine name and its declared argument count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: &'static CStr,
    pub arity: c_int,
}

impl EntryPoint {
    /// Name as UTF-8.
    pub fn name_str(&self) -> &'static str {
        self.name.to_str().unwrap_or_default()
    }
}

/// One table row, layout-compatible with R's `R_CallMethodDef`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CallMethodDef {
    name: *const c_char,
    fun: Option<DlFunc>,
    num_args: c_int,
}

impl CallMethodDef {
    /// Row that terminates a table.
    pub const END: Self = Self {
        name: std::ptr::null(),
        fun: None,
        num_args: 0,
    };

    /// Row binding `entry` to `fun`.
    pub const fn bind(entry: EntryPoint, fun: DlFunc) -> Self {
        Self {
            name: entry.name.as_ptr(),
            fun: Some(fun),
            num_args: entry.arity,
        }
    }

    /// Whether this is the terminator row.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.fun.is_none()
    }

    /// Exported name, `None` for the terminator.
    pub fn name(&self) -> Option<&'static CStr> {
        if self.name.is_null() {
            return None;
        }
        // Non-null names only come from `bind`, which takes a `&'static CStr`.
        Some(unsafe { CStr::from_ptr(self.name) })
    }

    /// Native function pointer, `None` for the terminator.
    #[inline]
    pub fn fun(&self) -> Option<DlFunc> {
        self.fun
    }

    /// Declared argument count.
    #[inline]
    pub fn arity(&self) -> c_int {
        self.num_args
    }
}

/// Write-once routine table of `N` rows, the last being [`CallMethodDef::END`].
///
/// Built in a `static`; the terminator check runs at compile time there.
pub struct CallTable<const N: usize> {
    rows: [CallMethodDef; N],
}

// Rows hold only `'static` names and function pointers and are never mutated.
unsafe impl<const N: usize> Sync for CallTable<N> {}

impl<const N: usize> CallTable<N> {
    /// Build a table, panicking unless exactly the last row is the terminator.
    pub const fn new(rows: [CallMethodDef; N]) -> Self {
        assert!(N > 0 && rows[N - 1].is_end(), "call table must end with CallMethodDef::END");
        let mut i = 0;
        while i < N - 1 {
            assert!(!rows[i].is_end(), "terminator row before end of call table");
            i += 1;
        }
        Self { rows }
    }

    /// Registered rows, terminator excluded.
    pub fn entries(&self) -> impl Iterator<Item = &CallMethodDef> {
        self.rows[..N - 1].iter()
    }

    /// Number of registered rows.
    pub fn len(&self) -> usize {
        N - 1
    }

    /// Whether the table registers nothing.
    pub fn is_empty(&self) -> bool {
        N == 1
    }

    /// Find the row exported as `name`.
    pub fn lookup(&self, name: &str) -> Option<&CallMethodDef> {
        self.entries()
            .find(|row| row.name().is_some_and(|n| n.to_bytes() == name.as_bytes()))
    }

    /// All rows including the terminator, as handed to the host.
    pub fn as_slice(&self) -> &[CallMethodDef] {
        &self.rows
    }
}
