//! Panic and error containment at the `extern "C"` boundary.
//!
//! Neither a Rust panic nor a Rust error may cross into the host. Entry
//! points run their body through [`contain`] and get back an [`Outcome`]
//! that owns nothing needing `Drop`, so the host's non-local error exit can
//! be taken safely afterwards.

use std::any::Any;
use std::fmt::Display;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Capacity of an error message, NUL terminator included.
pub const MESSAGE_CAPACITY: usize = 256;

/// NUL-terminated, fixed-size error message.
#[derive(Clone, Copy)]
pub struct Message([u8; MESSAGE_CAPACITY]);

impl Message {
    /// Format `"{entry}: {detail}"`, truncated to fit.
    pub fn new(entry: &str, detail: &dyn Display) -> Self {
        let mut buf = [0u8; MESSAGE_CAPACITY];
        let mut cursor = &mut buf[..MESSAGE_CAPACITY - 1];
        // A full buffer reports WriteZero; the truncated text is kept.
        let _ = write!(cursor, "{entry}: {detail}");
        Self(buf)
    }

    /// Pointer to the C string.
    pub fn as_ptr(&self) -> *const libc::c_char {
        self.0.as_ptr().cast()
    }

    /// Message text up to the first NUL.
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(MESSAGE_CAPACITY);
        match std::str::from_utf8(&self.0[..end]) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&self.0[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Message").field(&self.as_str()).finish()
    }
}

/// Result of a contained call.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<T: Copy> {
    /// The call returned a value.
    Value(T),
    /// The call failed or panicked; raise this in the host.
    Raise(Message),
}

/// Run `call`, turning errors and panics into [`Outcome::Raise`].
pub fn contain<T, E, F>(entry: &str, call: F) -> Outcome<T>
where
    T: Copy,
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Outcome::Value(value),
        Ok(Err(err)) => {
            error!(entry, error = %err, "native call failed");
            Outcome::Raise(Message::new(entry, &err))
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!(entry, panic = %msg, "native call panicked");
            Outcome::Raise(Message::new(entry, &msg))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
