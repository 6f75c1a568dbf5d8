//! CBLAS entry points for the host BLAS backend.

use std::any::TypeId;

use kernels_traits::Scalar;

/// Rotation routines of a CBLAS implementation, per scalar type.
///
/// # Safety
/// Callers pass pointers valid for `n` elements at the given increments.
trait BlasRotation: Sized {
    unsafe fn rotm(n: usize, x: *mut Self, incx: isize, y: *mut Self, incy: isize, param: *const Self);

    #[allow(clippy::too_many_arguments)]
    unsafe fn rot(n: usize, x: *mut Self, incx: isize, y: *mut Self, incy: isize, c: Self, s: Self);
}

impl BlasRotation for f64 {
    unsafe fn rotm(n: usize, x: *mut f64, incx: isize, y: *mut f64, incy: isize, param: *const f64) {
        cblas_sys::cblas_drotm(n as _, x, incx as _, y, incy as _, param);
    }

    unsafe fn rot(n: usize, x: *mut f64, incx: isize, y: *mut f64, incy: isize, c: f64, s: f64) {
        cblas_sys::cblas_drot(n as _, x, incx as _, y, incy as _, c, s);
    }
}

impl BlasRotation for f32 {
    unsafe fn rotm(n: usize, x: *mut f32, incx: isize, y: *mut f32, incy: isize, param: *const f32) {
        cblas_sys::cblas_srotm(n as _, x, incx as _, y, incy as _, param);
    }

    unsafe fn rot(n: usize, x: *mut f32, incx: isize, y: *mut f32, incy: isize, c: f32, s: f32) {
        cblas_sys::cblas_srot(n as _, x, incx as _, y, incy as _, c, s);
    }
}

#[inline]
fn is<S: 'static, T: 'static>() -> bool {
    TypeId::of::<S>() == TypeId::of::<T>()
}

/// Forward `rotm` to CBLAS. Returns `false` if `S` has no CBLAS routine.
///
/// # Safety
/// `x` and `y` must be valid for `n` elements at unit stride.
pub(crate) unsafe fn rotm<S: Scalar>(n: usize, x: *mut S, y: *mut S, param: &[S; 5]) -> bool {
    if is::<S, f64>() {
        f64::rotm(n, x.cast(), 1, y.cast(), 1, param.as_ptr().cast());
    } else if is::<S, f32>() {
        f32::rotm(n, x.cast(), 1, y.cast(), 1, param.as_ptr().cast());
    } else {
        return false;
    }
    true
}

/// Forward `rot` to CBLAS. Returns `false` if `S` has no CBLAS routine.
///
/// # Safety
/// `x` and `y` must be valid for `n` elements at unit stride.
pub(crate) unsafe fn rot<S: Scalar>(n: usize, x: *mut S, y: *mut S, c: S, s: S) -> bool {
    let cs = [c, s];
    if is::<S, f64>() {
        let cs = cs.as_ptr().cast::<f64>();
        f64::rot(n, x.cast(), 1, y.cast(), 1, *cs, *cs.add(1));
    } else if is::<S, f32>() {
        let cs = cs.as_ptr().cast::<f32>();
        f32::rot(n, x.cast(), 1, y.cast(), 1, *cs, *cs.add(1));
    } else {
        return false;
    }
    true
}
