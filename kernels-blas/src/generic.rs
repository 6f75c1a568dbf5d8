//! Portable bodies, used whenever no vendor backend is selected.

use kernels_exec::{ExecutionSpace, SendPtr};
use num_traits::Float;

/// `[h11, h12, h21, h22]` for a `rotm` parameter block, or `None` when the
/// flag selects the identity.
///
/// `param = [flag, h11, h21, h12, h22]`; flag `-2` is the identity, a
/// negative flag uses all four entries, `0` fixes the diagonal to one and a
/// positive flag fixes `h12 = 1`, `h21 = -1`.
pub(crate) fn rotm_matrix<S: Float>(param: &[S; 5]) -> Option<[S; 4]> {
    let [flag, h11, h21, h12, h22] = *param;
    let one = S::one();
    let two = one + one;
    if flag == -two {
        None
    } else if flag < S::zero() {
        Some([h11, h12, h21, h22])
    } else if flag == S::zero() {
        Some([one, h12, h21, one])
    } else {
        Some([h11, one, -one, h22])
    }
}

/// Apply a 2x2 rotation `[[a, b], [c, d]]` to every pair `(x[i], y[i])`.
///
/// # Safety
/// `x.offset(i * incx)` and `y.offset(i * incy)` must be valid, non-aliasing
/// elements for every `i < n`.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn apply<E, S>(
    exec: &E,
    n: usize,
    x: SendPtr<S>,
    incx: isize,
    y: SendPtr<S>,
    incy: isize,
    h: [S; 4],
) where
    E: ExecutionSpace,
    S: Float + Send + Sync,
{
    let [a, b, c, d] = h;
    exec.parallel_for(0..n, move |i| {
        let xi = x.as_ptr().offset(i as isize * incx);
        let yi = y.as_ptr().offset(i as isize * incy);
        let (xv, yv) = (*xi, *yi);
        *xi = a * xv + b * yv;
        *yi = c * xv + d * yv;
    });
}
