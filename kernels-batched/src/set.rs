//! Element-wise fill of 2-D strided blocks.

use kernels_exec::{parallel_for_team, ExecutionSpace, SendPtr, TeamMember, TeamPolicy};
use kernels_traits::{Layout, MemorySpace};
use kernels_view::StridedViewMut;

use crate::{check_block, BatchedError, Result};

/// Loop order for a fill of an `m x n` block with strides `(as0, as1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    /// The block is one dense run; fill `m*n` consecutive elements.
    Linear,
    /// Rows outer, columns inner.
    RowsOuter,
    /// Columns outer, rows inner.
    ColsOuter,
}

fn traversal(m: usize, n: usize, as0: isize, as1: isize) -> Traversal {
    let row_major = as1 == 1 && as0 == n as isize;
    let col_major = as0 == 1 && as1 == m as isize;
    if row_major || col_major {
        Traversal::Linear
    } else if as0.unsigned_abs() > as1.unsigned_abs() {
        Traversal::RowsOuter
    } else {
        Traversal::ColsOuter
    }
}

/// Fill `m x n` elements starting at `a` with strides `(as0, as1)`.
///
/// # Safety
/// Every `a.offset(i*as0 + j*as1)` for `i < m`, `j < n` must be valid for
/// writes, and nothing else may access those elements concurrently.
unsafe fn fill_raw<T: Copy>(m: usize, n: usize, alpha: T, a: *mut T, as0: isize, as1: isize) {
    match traversal(m, n, as0, as1) {
        Traversal::Linear => {
            for k in 0..m * n {
                *a.add(k) = alpha;
            }
        }
        Traversal::RowsOuter => {
            for i in 0..m as isize {
                for j in 0..n as isize {
                    *a.offset(i * as0 + j * as1) = alpha;
                }
            }
        }
        Traversal::ColsOuter => {
            for j in 0..n as isize {
                for i in 0..m as isize {
                    *a.offset(i * as0 + j * as1) = alpha;
                }
            }
        }
    }
}

/// Single-threaded fill of a strided block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialSet;

impl SerialSet {
    /// Set every element of the `m x n` block of `a` with strides
    /// `(as0, as1)` to `alpha`.
    pub fn invoke<T: Copy>(
        m: usize,
        n: usize,
        alpha: T,
        a: &mut [T],
        as0: usize,
        as1: usize,
    ) -> Result<()> {
        check_block(a.len(), m, n, as0, as1)?;
        if m == 0 || n == 0 {
            return Ok(());
        }
        // SAFETY: check_block bounds every offset by a.len(), and the
        // exclusive borrow rules out concurrent access.
        unsafe { fill_raw(m, n, alpha, a.as_mut_ptr(), as0 as isize, as1 as isize) };
        Ok(())
    }
}

/// Cooperative fill of a strided block by the members of one team.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamSet;

impl TeamSet {
    /// Each member fills its share of the `m*n` logical index space; with
    /// `team_barrier` set the team synchronises before returning.
    ///
    /// # Safety
    /// Every `a.offset(i*as0 + j*as1)` for `i < m`, `j < n` must be valid for
    /// writes, distinct `(i, j)` must reach distinct elements, and no code
    /// outside this team may access those elements until every member has
    /// returned.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn invoke<T: Copy>(
        member: &TeamMember<'_>,
        m: usize,
        n: usize,
        alpha: T,
        a: SendPtr<T>,
        as0: isize,
        as1: isize,
        team_barrier: bool,
    ) {
        let a = a.as_ptr();
        match traversal(m, n, as0, as1) {
            Traversal::Linear => {
                member.team_thread_range(0..m * n, |k| *a.add(k) = alpha);
            }
            Traversal::RowsOuter => {
                member.team_thread_range(0..m * n, |ij| {
                    let (i, j) = ((ij / n) as isize, (ij % n) as isize);
                    *a.offset(i * as0 + j * as1) = alpha;
                });
            }
            Traversal::ColsOuter => {
                member.team_thread_range(0..m * n, |ij| {
                    let (i, j) = ((ij % m) as isize, (ij / m) as isize);
                    *a.offset(i * as0 + j * as1) = alpha;
                });
            }
        }
        if team_barrier {
            member.team_barrier();
        }
    }
}

fn block_of<T, L: Layout, M: MemorySpace>(
    view: &StridedViewMut<'_, T, L, M>,
) -> Result<(usize, usize, isize, isize)> {
    if view.ndim() != 2 {
        return Err(BatchedError::Rank {
            expected: 2,
            got: view.ndim(),
        });
    }
    let (dims, strides) = (view.dims(), view.strides());
    Ok((dims[0], dims[1], strides[0], strides[1]))
}

/// Set every element of a 2-D view to `alpha`.
pub fn set<T: Copy, L: Layout, M: MemorySpace>(
    view: &mut StridedViewMut<'_, T, L, M>,
    alpha: T,
) -> Result<()> {
    let (m, n, as0, as1) = block_of(view)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    // SAFETY: view construction validated every in-shape offset against the
    // borrowed buffer, which the view holds exclusively.
    unsafe { fill_raw(m, n, alpha, view.as_mut_ptr(), as0, as1) };
    Ok(())
}

/// Set every element of every 2-D view in `views` to `alpha`, one team per
/// view.
pub fn set_batched<E, T, L, M>(
    exec: &E,
    team_size: usize,
    views: &mut [StridedViewMut<'_, T, L, M>],
    alpha: T,
) -> Result<()>
where
    E: ExecutionSpace,
    T: Copy + Send + Sync,
    L: Layout,
    M: MemorySpace,
{
    let policy = TeamPolicy::new(views.len(), team_size)?;
    let mut blocks = Vec::with_capacity(views.len());
    for view in views.iter_mut() {
        let (m, n, as0, as1) = block_of(view)?;
        blocks.push((SendPtr(view.as_mut_ptr()), m, n, as0, as1));
    }
    parallel_for_team(exec, &policy, |member| {
        let (a, m, n, as0, as1) = blocks[member.league_rank()];
        // SAFETY: each league owns one view and the views are distinct
        // mutable borrows. A mutable view maps distinct indices to distinct
        // elements, so the disjoint index ranges of team members never share
        // a location.
        unsafe { TeamSet::invoke(member, m, n, alpha, a, as0, as1, false) };
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernels_exec::Serial;
    use kernels_traits::{LayoutLeft, LayoutRight, LayoutStride};

    #[test]
    fn test_traversal_selection() {
        assert_eq!(traversal(3, 4, 4, 1), Traversal::Linear);
        assert_eq!(traversal(3, 4, 1, 3), Traversal::Linear);
        assert_eq!(traversal(3, 4, 8, 2), Traversal::RowsOuter);
        assert_eq!(traversal(3, 4, 2, 8), Traversal::ColsOuter);
    }

    #[test]
    fn test_square_row_major_is_linear_only_with_matching_stride() {
        // a 3x3 block inside a 3x5 row-major buffer is not a dense run
        assert_eq!(traversal(3, 3, 5, 1), Traversal::RowsOuter);
        assert_eq!(traversal(3, 3, 3, 1), Traversal::Linear);
    }

    #[test]
    fn test_serial_set_contiguous() {
        let mut a = vec![0.0f64; 12];
        SerialSet::invoke(3, 4, 2.5, &mut a, 4, 1).unwrap();
        assert!(a.iter().all(|&x| x == 2.5));
    }

    #[test]
    fn test_serial_set_sub_block_leaves_rest() {
        // 2x2 block at the top-left of a 3x4 row-major buffer
        let mut a = vec![0i32; 12];
        SerialSet::invoke(2, 2, 7, &mut a, 4, 1).unwrap();
        assert_eq!(a, vec![7, 7, 0, 0, 7, 7, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_serial_set_column_major_strided() {
        // every other row of a 4x2 column-major buffer
        let mut a = vec![0i32; 8];
        SerialSet::invoke(2, 2, 1, &mut a, 2, 4).unwrap();
        assert_eq!(a, vec![1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_serial_set_out_of_bounds() {
        let mut a = vec![0i32; 11];
        assert!(matches!(
            SerialSet::invoke(3, 4, 1, &mut a, 4, 1),
            Err(BatchedError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_set_view_with_negative_stride() {
        let mut data = vec![0i32; 6];
        {
            // rows reversed: row 0 of the view is the last row in memory
            let mut view =
                StridedViewMut::<i32, LayoutStride>::new(&mut data, &[2, 2], &[-3, 1], 3).unwrap();
            set(&mut view, 9).unwrap();
        }
        assert_eq!(data, vec![9, 9, 0, 9, 9, 0]);
    }

    #[test]
    fn test_set_rejects_rank_three() {
        let mut data = vec![0i32; 8];
        let mut view = StridedViewMut::<i32, LayoutRight>::from_slice(&mut data, &[2, 2, 2]).unwrap();
        assert!(matches!(
            set(&mut view, 1),
            Err(BatchedError::Rank { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_set_batched_serial() {
        let mut a = vec![0i32; 6];
        let mut b = vec![0i32; 6];
        {
            let mut views = vec![
                StridedViewMut::<i32, LayoutLeft>::from_slice(&mut a, &[2, 3]).unwrap(),
                StridedViewMut::<i32, LayoutLeft>::from_slice(&mut b, &[2, 3]).unwrap(),
            ];
            set_batched(&Serial, 4, &mut views, 3).unwrap();
        }
        assert!(a.iter().chain(&b).all(|&x| x == 3));
    }
}
