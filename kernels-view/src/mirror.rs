//! Host mirrors and deep copies between views.
//!
//! Every memory space available in this workspace is host-addressable, so a
//! mirror is an owned row-major copy and a deep copy is an element-wise copy
//! in multi-index order.

use kernels_traits::{Layout, LayoutRight, MemorySpace};

use crate::view::{StridedArray, StridedView, StridedViewMut};
use crate::{Result, ViewError};

/// Visit every multi-index of `dims` in row-major order.
fn for_each_index(dims: &[usize], mut f: impl FnMut(&[usize])) {
    if dims.iter().any(|&d| d == 0) {
        return;
    }
    let rank = dims.len();
    let mut idx = vec![0usize; rank];
    loop {
        f(&idx);
        let mut d = rank;
        loop {
            if d == 0 {
                return;
            }
            d -= 1;
            idx[d] += 1;
            if idx[d] < dims[d] {
                break;
            }
            idx[d] = 0;
        }
    }
}

/// Copy every element of `src` into `dst`. Shapes must match exactly.
pub fn deep_copy<T, L1, M1, L2, M2>(
    dst: &mut StridedViewMut<'_, T, L1, M1>,
    src: &StridedView<'_, T, L2, M2>,
) -> Result<()>
where
    T: Copy,
    L1: Layout,
    M1: MemorySpace,
    L2: Layout,
    M2: MemorySpace,
{
    if dst.dims() != src.dims() {
        return Err(ViewError::ShapeMismatch(
            dst.dims().to_vec(),
            src.dims().to_vec(),
        ));
    }
    let dims = src.dims().to_vec();
    for_each_index(&dims, |idx| dst.set(idx, src.get(idx)));
    Ok(())
}

/// Allocate an owned row-major host array with the same shape as `src` and
/// copy its contents.
pub fn create_mirror_view_and_copy<T, L, M>(src: &StridedView<'_, T, L, M>) -> StridedArray<T>
where
    T: Copy,
    L: Layout,
    M: MemorySpace,
{
    StridedArray::<T, LayoutRight>::from_fn(src.dims(), |idx| src.get(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernels_traits::{LayoutLeft, LayoutStride};

    #[test]
    fn test_for_each_index_order() {
        let mut seen = Vec::new();
        for_each_index(&[2, 2], |idx| seen.push(idx.to_vec()));
        assert_eq!(seen, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn test_for_each_index_empty_and_scalar() {
        let mut count = 0;
        for_each_index(&[3, 0], |_| count += 1);
        assert_eq!(count, 0);
        for_each_index(&[], |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_deep_copy_across_layouts() {
        let src = StridedArray::<f64, LayoutLeft>::from_fn(&[3, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
        let mut dst = StridedArray::<f64, LayoutRight>::new(&[3, 2]);
        deep_copy(&mut dst.view_mut(), &src.view()).unwrap();
        assert_eq!(dst.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_deep_copy_shape_mismatch() {
        let src = StridedArray::<f64>::new(&[2, 3]);
        let mut dst = StridedArray::<f64>::new(&[3, 2]);
        assert!(matches!(
            deep_copy(&mut dst.view_mut(), &src.view()),
            Err(ViewError::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_mirror_of_strided_view() {
        let data: Vec<i32> = (0..12).collect();
        // 2x3 view picking every other column of a 2x6 row-major buffer
        let view = StridedView::<i32, LayoutStride>::new(&data, &[2, 3], &[6, 2], 0).unwrap();
        let mirror = create_mirror_view_and_copy(&view);
        assert_eq!(mirror.dims(), &[2, 3]);
        assert_eq!(mirror.data(), &[0, 2, 4, 6, 8, 10]);
    }
}
