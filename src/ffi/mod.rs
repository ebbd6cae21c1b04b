//! FFI layer: the symbols R resolves when the package is loaded.

pub mod boundary;
#[cfg(feature = "r")]
pub mod entry;

pub use boundary::{contain, Message, Outcome};
#[cfg(feature = "r")]
pub use entry::*;
