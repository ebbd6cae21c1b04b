//! Marshalling between host values and the external routines.
//!
//! Both operations follow the same shape: borrow raw storage from the
//! inputs (rejecting anything that is not a double vector), allocate one
//! length-1 result, keep it protected while the routine
//! runs, and hand it back holding exactly what the routine wrote. Nothing is
//! validated; inputs shorter than the routine expects are read past their
//! end, as in any binding of this style.

use crate::error::BridgeError;
use crate::host::{Host, ProtectGuard};
use crate::routine::{BinaryRoutine, UnaryRoutine};
use libc::c_int;
use tracing::trace;

/// Call a two-scalar routine: `routine(a, b, &mut ret)`.
///
/// # Safety
/// `a` and `b` must each hold at least one element, and `routine` must
/// write at most one `f64` through its out-pointer.
pub unsafe fn invoke_binary_scalar<H: Host + ?Sized>(
    host: &H,
    routine: BinaryRoutine,
    a: H::Value,
    b: H::Value,
) -> Result<H::Value, BridgeError> {
    let a_ptr = host.real_ptr(a)?;
    let b_ptr = host.real_ptr(b)?;

    let ret = ProtectGuard::new(host, host.alloc_real(1)?);
    let out = host.real_ptr(ret.value())?;

    trace!("invoking binary routine");
    routine(a_ptr, b_ptr, out);

    Ok(ret.value())
}

/// Call a vector routine with two scalar parameters:
/// `routine(x, n, l, a, &mut ret)` where `n` is the length of `x`.
///
/// # Safety
/// `l` and `a` must each hold at least one element, and `routine` must read
/// at most `n` elements of `x` and write at most one `f64` through its
/// out-pointer.
pub unsafe fn invoke_unary_scalar_with_parameters<H: Host + ?Sized>(
    host: &H,
    routine: UnaryRoutine,
    x: H::Value,
    l: H::Value,
    a: H::Value,
) -> Result<H::Value, BridgeError> {
    let len = host.length(x)?;
    let n = c_int::try_from(len).map_err(|_| BridgeError::LengthOverflow { len })?;
    let x_ptr = host.real_ptr(x)?;
    let l_ptr = host.real_ptr(l)?;
    let a_ptr = host.real_ptr(a)?;

    let ret = ProtectGuard::new(host, host.alloc_real(1)?);
    let out = host.real_ptr(ret.value())?;

    trace!(n, "invoking unary routine");
    routine(x_ptr, n, l_ptr, a_ptr, out);

    Ok(ret.value())
}
