//! fortloop - R `.Call` bridge into compiled Fortran routines.
//!
//! The crate exposes two native entry points to R and forwards each call to
//! an external numeric routine:
//!
//! - `c_add_f(a, b)` calls `add_f(a, b, ret)`
//! - `c_llc_f(x, l, a)` calls `llc_f(x, length(x), l, a, ret)`
//!
//! Both return a freshly allocated length-1 numeric vector holding whatever
//! the routine wrote through `ret`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    FFI Layer (fortloop.h, `r`)      │
//! │  c_llc_f / c_add_f / R_init_*       │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │            Bridge                   │
//! │  ┌───────────┐  ┌───────────────┐  │
//! │  │   Host    │  │   Routines    │  │
//! │  │ (protect) │  │ (Fortran ABI) │  │
//! │  └───────────┘  └───────────────┘  │
//! │  ┌───────────────────────────────┐ │
//! │  │  Registry (write-once table)  │ │
//! │  └───────────────────────────────┘ │
//! └─────────────────────────────────────┘
//! ```
//!
//! The bridge is generic over [`Host`], so it runs against the in-process
//! [`MemoryHost`] in tests. Building with the `r` feature adds the R host,
//! the linked Fortran symbols and the exported C functions.
//!
//! # Usage from R
//!
//! ```r
//! .Call("c_add_f", 2, 3)                # 5
//! .Call("c_llc_f", c(1, 2, 3), 0.5, 1)
//! ```

pub mod bridge;
pub mod error;
pub mod ffi;
pub mod host;
pub mod registry;
pub mod routine;

// Re-export commonly used items
pub use bridge::{invoke_binary_scalar, invoke_unary_scalar_with_parameters};
pub use error::{BridgeError, HostError};
pub use host::{
    Handle, Host, HostStats, MemoryHost, MemoryHostConfig, ProtectGuard, VectorType,
};
pub use registry::{
    register_entry_points, CallMethodDef, CallTable, EntryPoint, RegistrationConfig, Registrar,
    ENTRY_POINTS,
};
pub use routine::{BinaryRoutine, RoutineSet, UnaryRoutine};

// Re-export FFI symbols for cbindgen
#[cfg(feature = "r")]
pub use ffi::entry::*;
