//! Scoped collection-safety guard.

use super::Host;

/// Keeps a freshly allocated value protected from the host collector.
///
/// Protection is taken in [`ProtectGuard::new`] and released in `Drop`, so it
/// is undone exactly once on every exit path, including unwinding. Guards
/// declared in the same scope drop in reverse order, which matches the
/// host's stack discipline.
#[must_use = "the value is unprotected as soon as the guard is dropped"]
pub struct ProtectGuard<'h, H: Host + ?Sized> {
    host: &'h H,
    value: H::Value,
}

impl<'h, H: Host + ?Sized> ProtectGuard<'h, H> {
    /// Protect `value` until the guard goes out of scope.
    pub fn new(host: &'h H, value: H::Value) -> Self {
        host.protect(value);
        Self { host, value }
    }

    /// The protected value.
    #[inline]
    pub fn value(&self) -> H::Value {
        self.value
    }
}

impl<H: Host + ?Sized> Drop for ProtectGuard<'_, H> {
    fn drop(&mut self) {
        self.host.unprotect(1);
    }
}
