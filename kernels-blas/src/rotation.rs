//! `rotm` and `rot` entry points.

use kernels_exec::{ExecutionSpace, SendPtr};
use kernels_traits::{Layout, MemorySpace, Scalar};
use kernels_view::StridedViewMut;
use num_traits::Float;

#[cfg(feature = "blas")]
use crate::backend::BackendId;
use crate::dispatch::Signature;
use crate::generic;
use crate::{BlasError, Result};

/// Check that `x` and `y` are rank-1 views of equal length and return it.
fn vector_len<S, L: Layout, M: MemorySpace>(
    x: &StridedViewMut<'_, S, L, M>,
    y: &StridedViewMut<'_, S, L, M>,
) -> Result<usize> {
    for v in [x.ndim(), y.ndim()] {
        if v != 1 {
            return Err(BlasError::Rank { expected: 1, got: v });
        }
    }
    let (nx, ny) = (x.dims()[0], y.dims()[0]);
    if nx != ny {
        return Err(BlasError::LengthMismatch { x: nx, y: ny });
    }
    Ok(nx)
}

/// Apply the modified Givens rotation described by `param` to `x` and `y`.
///
/// `param = [flag, h11, h21, h12, h22]`, and each pair becomes
/// `(h11*x + h12*y, h21*x + h22*y)`, with the entries implied by `flag`:
///
/// | flag | H                          |
/// |------|----------------------------|
/// | -2   | identity                   |
/// | -1   | `[[h11, h12], [h21, h22]]` |
/// |  0   | `[[1, h12], [h21, 1]]`     |
/// |  1   | `[[h11, 1], [-1, h22]]`    |
///
/// Dispatches to a vendor backend when [`Signature::ROTM_AVAILABLE`] holds
/// for `(E, S, L, M)`, otherwise runs the portable body on `exec`.
///
/// ```rust
/// use kernels_blas::rotm;
/// use kernels_exec::Serial;
/// use kernels_view::{LayoutRight, StridedViewMut};
///
/// let mut x = vec![1.0, 2.0];
/// let mut y = vec![3.0, 4.0];
/// let mut xv = StridedViewMut::<f64, LayoutRight>::from_slice(&mut x, &[2]).unwrap();
/// let mut yv = StridedViewMut::<f64, LayoutRight>::from_slice(&mut y, &[2]).unwrap();
/// // flag 1: x' = 2x + y, y' = -x + 3y
/// rotm(&Serial, &mut xv, &mut yv, &[1.0, 2.0, 0.0, 0.0, 3.0]).unwrap();
/// drop((xv, yv));
/// assert_eq!(x, vec![5.0, 8.0]);
/// assert_eq!(y, vec![8.0, 10.0]);
/// ```
pub fn rotm<E, S, L, M>(
    exec: &E,
    x: &mut StridedViewMut<'_, S, L, M>,
    y: &mut StridedViewMut<'_, S, L, M>,
    param: &[S; 5],
) -> Result<()>
where
    E: ExecutionSpace,
    S: Scalar + Float,
    L: Layout,
    M: MemorySpace,
{
    let n = vector_len(x, y)?;
    tracing::debug!(
        op = "rotm",
        n,
        exec = E::NAME,
        backend = ?Signature::<E, S, L, M>::ROTM_BACKEND,
        "dispatch"
    );
    let Some(h) = generic::rotm_matrix(param) else {
        return Ok(());
    };
    if n == 0 {
        return Ok(());
    }

    #[cfg(feature = "blas")]
    {
        if Signature::<E, S, L, M>::ROTM_BACKEND == Some(BackendId::HostBlas) {
            // SAFETY: registered layouts are dense, so rank-1 views have unit
            // stride and n elements.
            if unsafe { crate::host::rotm(n, x.as_mut_ptr(), y.as_mut_ptr(), param) } {
                return Ok(());
            }
        }
    }

    let (incx, incy) = (x.strides()[0], y.strides()[0]);
    let (xp, yp) = (SendPtr(x.as_mut_ptr()), SendPtr(y.as_mut_ptr()));
    // SAFETY: a mutable view's constructor checks that every in-range index
    // lies in its buffer and owns a distinct element, so parallel tasks write
    // disjoint locations. x and y are distinct exclusive borrows.
    unsafe { generic::apply(exec, n, xp, incx, yp, incy, h) };
    Ok(())
}

/// Apply the plain Givens rotation `x <- c*x + s*y`, `y <- c*y - s*x`.
///
/// Dispatches like [`rotm`], using [`Signature::ROT_AVAILABLE`].
pub fn rot<E, S, L, M>(
    exec: &E,
    x: &mut StridedViewMut<'_, S, L, M>,
    y: &mut StridedViewMut<'_, S, L, M>,
    c: S,
    s: S,
) -> Result<()>
where
    E: ExecutionSpace,
    S: Scalar + Float,
    L: Layout,
    M: MemorySpace,
{
    let n = vector_len(x, y)?;
    tracing::debug!(
        op = "rot",
        n,
        exec = E::NAME,
        backend = ?Signature::<E, S, L, M>::ROT_BACKEND,
        "dispatch"
    );
    if n == 0 {
        return Ok(());
    }

    #[cfg(feature = "blas")]
    {
        if Signature::<E, S, L, M>::ROT_BACKEND == Some(BackendId::HostBlas) {
            // SAFETY: see `rotm`.
            if unsafe { crate::host::rot(n, x.as_mut_ptr(), y.as_mut_ptr(), c, s) } {
                return Ok(());
            }
        }
    }

    let (incx, incy) = (x.strides()[0], y.strides()[0]);
    let (xp, yp) = (SendPtr(x.as_mut_ptr()), SendPtr(y.as_mut_ptr()));
    // SAFETY: see `rotm`.
    unsafe { generic::apply(exec, n, xp, incx, yp, incy, [c, s, -s, c]) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kernels_exec::Serial;
    use kernels_traits::{LayoutLeft, LayoutStride};

    fn run_rotm(x: &mut [f64], y: &mut [f64], param: [f64; 5]) {
        let n = x.len();
        let mut xv = StridedViewMut::<f64, LayoutLeft>::from_slice(x, &[n]).unwrap();
        let mut yv = StridedViewMut::<f64, LayoutLeft>::from_slice(y, &[n]).unwrap();
        rotm(&Serial, &mut xv, &mut yv, &param).unwrap();
    }

    #[test]
    fn test_rotm_identity_flag() {
        let (mut x, mut y) = (vec![1.0, 2.0], vec![3.0, 4.0]);
        run_rotm(&mut x, &mut y, [-2.0, 9.0, 9.0, 9.0, 9.0]);
        assert_eq!(x, vec![1.0, 2.0]);
        assert_eq!(y, vec![3.0, 4.0]);
    }

    #[test]
    fn test_rotm_full_matrix() {
        let (mut x, mut y) = (vec![1.0, 2.0], vec![3.0, 4.0]);
        // h11 = 2, h21 = 3, h12 = 4, h22 = 5
        run_rotm(&mut x, &mut y, [-1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(x, vec![2.0 + 12.0, 4.0 + 16.0]);
        assert_eq!(y, vec![3.0 + 15.0, 6.0 + 20.0]);
    }

    #[test]
    fn test_rotm_unit_diagonal_flag() {
        let (mut x, mut y) = (vec![1.0], vec![3.0]);
        run_rotm(&mut x, &mut y, [0.0, 7.0, 0.5, 2.0, 7.0]);
        assert_relative_eq!(x[0], 1.0 + 2.0 * 3.0);
        assert_relative_eq!(y[0], 0.5 * 1.0 + 3.0);
    }

    #[test]
    fn test_rotm_length_mismatch() {
        let (mut x, mut y) = (vec![1.0, 2.0], vec![3.0]);
        let mut xv = StridedViewMut::<f64, LayoutLeft>::from_slice(&mut x, &[2]).unwrap();
        let mut yv = StridedViewMut::<f64, LayoutLeft>::from_slice(&mut y, &[1]).unwrap();
        assert!(matches!(
            rotm(&Serial, &mut xv, &mut yv, &[-1.0, 1.0, 0.0, 0.0, 1.0]),
            Err(BlasError::LengthMismatch { x: 2, y: 1 })
        ));
    }

    #[test]
    fn test_rot_strided_views() {
        // x reads every other element, y runs backwards
        let mut xs = vec![1.0f32, -1.0, 2.0, -1.0];
        let mut ys = vec![4.0f32, 3.0];
        {
            let mut xv = StridedViewMut::<f32, LayoutStride>::new(&mut xs, &[2], &[2], 0).unwrap();
            let mut yv = StridedViewMut::<f32, LayoutStride>::new(&mut ys, &[2], &[-1], 1).unwrap();
            rot(&Serial, &mut xv, &mut yv, 0.0, 1.0).unwrap();
        }
        // c = 0, s = 1 swaps with a sign flip on y: x <- y, y <- -x
        assert_eq!(xs, vec![3.0, -1.0, 4.0, -1.0]);
        assert_eq!(ys, vec![-2.0, -1.0]);
    }

    #[test]
    fn test_rot_rejects_matrix() {
        let mut a = vec![0.0f64; 4];
        let mut b = vec![0.0f64; 4];
        let mut av = StridedViewMut::<f64, LayoutLeft>::from_slice(&mut a, &[2, 2]).unwrap();
        let mut bv = StridedViewMut::<f64, LayoutLeft>::from_slice(&mut b, &[2, 2]).unwrap();
        assert!(matches!(
            rot(&Serial, &mut av, &mut bv, 1.0, 0.0),
            Err(BlasError::Rank { expected: 1, got: 2 })
        ));
    }
}
