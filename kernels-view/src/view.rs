//! Borrowed views and owned arrays.
//!
//! A view pairs a buffer with a [`Shape`]. Views borrow their buffer, so a
//! view over a caller-owned slice behaves exactly like a view over a
//! [`StridedArray`]. Layout and memory space are type parameters only; they
//! change nothing at run time but make the view's type a complete dispatch
//! signature.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use kernels_traits::{ContiguousLayout, HostSpace, Layout, LayoutRight, LayoutStride, MemorySpace};

use crate::shape::Shape;
use crate::Result;

/// Shared, read-only strided view.
pub struct StridedView<'a, T, L: Layout = LayoutRight, M: MemorySpace = HostSpace> {
    data: &'a [T],
    shape: Shape,
    _tags: PhantomData<(L, M)>,
}

/// Exclusive strided view.
pub struct StridedViewMut<'a, T, L: Layout = LayoutRight, M: MemorySpace = HostSpace> {
    data: &'a mut [T],
    shape: Shape,
    _tags: PhantomData<(L, M)>,
}

/// Owned dense array in layout `L`, always in host memory.
pub struct StridedArray<T, L: ContiguousLayout = LayoutRight> {
    data: Vec<T>,
    shape: Shape,
    _layout: PhantomData<L>,
}

/// Accessors every view type shares through its shape.
macro_rules! shape_accessors {
    () => {
        #[inline]
        pub fn shape(&self) -> &Shape {
            &self.shape
        }

        #[inline]
        pub fn dims(&self) -> &[usize] {
            self.shape.dims()
        }

        #[inline]
        pub fn strides(&self) -> &[isize] {
            self.shape.strides()
        }

        #[inline]
        pub fn extent(&self, dim: usize) -> usize {
            self.shape.dims()[dim]
        }

        #[inline]
        pub fn ndim(&self) -> usize {
            self.shape.rank()
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.shape.size()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.shape.size() == 0
        }
    };
}

impl<'a, T, L: Layout, M: MemorySpace> StridedView<'a, T, L, M> {
    fn with_shape(data: &'a [T], shape: Shape) -> Self {
        Self {
            data,
            shape,
            _tags: PhantomData,
        }
    }

    shape_accessors!();

    /// Buffer position of the element at multi-index zero.
    #[inline]
    pub fn offset(&self) -> usize {
        self.shape.offset()
    }

    /// The whole borrowed buffer, including elements outside the view.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Pointer to the element at multi-index zero.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.shape.offset())
    }

    /// The same view tagged `LayoutStride`.
    pub fn into_strided(self) -> StridedView<'a, T, LayoutStride, M> {
        StridedView::with_shape(self.data, self.shape)
    }

    /// Reorder axes; axis `k` of the result is axis `perm[k]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<StridedView<'a, T, LayoutStride, M>> {
        Ok(StridedView::with_shape(self.data, self.shape.permuted(perm)?))
    }
}

impl<'a, T, M: MemorySpace> StridedView<'a, T, LayoutStride, M> {
    /// View `data` with explicit strides and base offset. Fails unless every
    /// element of the view lies inside `data`.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        let shape = Shape::strided(data.len(), dims, strides, offset)?;
        Ok(Self::with_shape(data, shape))
    }
}

impl<'a, T, L: ContiguousLayout, M: MemorySpace> StridedView<'a, T, L, M> {
    /// View all of `data` densely in layout `L`.
    pub fn from_slice(data: &'a [T], dims: &[usize]) -> Result<Self> {
        let shape = Shape::contiguous::<L>(data.len(), dims)?;
        Ok(Self::with_shape(data, shape))
    }

    /// The viewed elements in memory order.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<T: Copy, L: Layout, M: MemorySpace> StridedView<'_, T, L, M> {
    pub fn get(&self, index: &[usize]) -> T {
        self.data[self.shape.position(index)]
    }
}

impl<T, L: Layout, M: MemorySpace> Clone for StridedView<'_, T, L, M> {
    fn clone(&self) -> Self {
        Self::with_shape(self.data, self.shape.clone())
    }
}

impl<T, L: Layout, M: MemorySpace> std::fmt::Debug for StridedView<'_, T, L, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("layout", &L::KIND)
            .field("space", &M::NAME)
            .field("shape", &self.shape)
            .finish()
    }
}

impl<'a, T, L: Layout, M: MemorySpace> StridedViewMut<'a, T, L, M> {
    fn with_shape(data: &'a mut [T], shape: Shape) -> Self {
        Self {
            data,
            shape,
            _tags: PhantomData,
        }
    }

    shape_accessors!();

    /// Buffer position of the element at multi-index zero.
    #[inline]
    pub fn offset(&self) -> usize {
        self.shape.offset()
    }

    /// Pointer to the element at multi-index zero.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.shape.offset())
    }

    /// Mutable pointer to the element at multi-index zero. Valid for every
    /// position the shape reaches.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_add(self.shape.offset())
    }

    /// The same view tagged `LayoutStride`.
    pub fn into_strided(self) -> StridedViewMut<'a, T, LayoutStride, M> {
        StridedViewMut::with_shape(self.data, self.shape)
    }

    /// Reorder axes, consuming the view so no two mutable views alias.
    pub fn permute(self, perm: &[usize]) -> Result<StridedViewMut<'a, T, LayoutStride, M>> {
        let shape = self.shape.permuted(perm)?;
        Ok(StridedViewMut::with_shape(self.data, shape))
    }

    /// Shared reborrow.
    pub fn as_view(&self) -> StridedView<'_, T, L, M> {
        StridedView::with_shape(&*self.data, self.shape.clone())
    }
}

impl<'a, T, M: MemorySpace> StridedViewMut<'a, T, LayoutStride, M> {
    /// Mutable counterpart of [`StridedView::new`]. Unlike a shared view, a
    /// mutable one must give every index its own element, so zero or
    /// overlapping strides fail with [`crate::ViewError::Aliased`].
    pub fn new(data: &'a mut [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        let shape = Shape::strided(data.len(), dims, strides, offset)?;
        shape.check_unaliased()?;
        Ok(Self::with_shape(data, shape))
    }
}

impl<'a, T, L: ContiguousLayout, M: MemorySpace> StridedViewMut<'a, T, L, M> {
    /// View all of `data` densely in layout `L`.
    pub fn from_slice(data: &'a mut [T], dims: &[usize]) -> Result<Self> {
        let shape = Shape::contiguous::<L>(data.len(), dims)?;
        Ok(Self::with_shape(data, shape))
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl<T: Copy, L: Layout, M: MemorySpace> StridedViewMut<'_, T, L, M> {
    pub fn get(&self, index: &[usize]) -> T {
        self.data[self.shape.position(index)]
    }

    pub fn set(&mut self, index: &[usize], value: T) {
        let pos = self.shape.position(index);
        self.data[pos] = value;
    }
}

impl<T, L: Layout, M: MemorySpace> std::fmt::Debug for StridedViewMut<'_, T, L, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("layout", &L::KIND)
            .field("space", &M::NAME)
            .field("shape", &self.shape)
            .finish()
    }
}

impl<T, L: ContiguousLayout> StridedArray<T, L> {
    /// Take ownership of `data`, read densely in layout `L`.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        let shape = Shape::contiguous::<L>(data.len(), dims)?;
        Ok(Self {
            data,
            shape,
            _layout: PhantomData,
        })
    }

    /// Fill from `f(index)`. `f` is called once per element, in memory order.
    pub fn from_fn(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let shape = Shape::packed::<L>(dims);
        let size = shape.size();
        // axes from fastest to slowest varying
        let mut order: Vec<usize> = (0..dims.len()).collect();
        order.sort_by_key(|&d| shape.strides()[d]);

        let mut data = Vec::with_capacity(size);
        let mut index = vec![0usize; dims.len()];
        while data.len() < size {
            data.push(f(&index));
            for &d in &order {
                index[d] += 1;
                if index[d] < dims[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        Self {
            data,
            shape,
            _layout: PhantomData,
        }
    }

    shape_accessors!();

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn view(&self) -> StridedView<'_, T, L, HostSpace> {
        StridedView::with_shape(&self.data, self.shape.clone())
    }

    pub fn view_mut(&mut self) -> StridedViewMut<'_, T, L, HostSpace> {
        StridedViewMut::with_shape(&mut self.data, self.shape.clone())
    }
}

impl<T: Clone + Default, L: ContiguousLayout> StridedArray<T, L> {
    /// An array of `T::default()`.
    pub fn new(dims: &[usize]) -> Self {
        let shape = Shape::packed::<L>(dims);
        Self {
            data: vec![T::default(); shape.size()],
            shape,
            _layout: PhantomData,
        }
    }
}

impl<T: Copy, L: ContiguousLayout> StridedArray<T, L> {
    pub fn get(&self, index: &[usize]) -> T {
        self.data[self.shape.position(index)]
    }

    pub fn set(&mut self, index: &[usize], value: T) {
        let pos = self.shape.position(index);
        self.data[pos] = value;
    }
}

impl<T, L: ContiguousLayout> Index<&[usize]> for StridedArray<T, L> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        &self.data[self.shape.position(index)]
    }
}

impl<T, L: ContiguousLayout> IndexMut<&[usize]> for StridedArray<T, L> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        let pos = self.shape.position(index);
        &mut self.data[pos]
    }
}

impl<T: Clone, L: ContiguousLayout> Clone for StridedArray<T, L> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            shape: self.shape.clone(),
            _layout: PhantomData,
        }
    }
}

impl<T: std::fmt::Debug, L: ContiguousLayout> std::fmt::Debug for StridedArray<T, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("layout", &L::KIND)
            .field("dims", &self.shape.dims())
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViewError;
    use kernels_traits::LayoutLeft;
    use num_complex::Complex32;

    // 0 1 2 3
    // 4 5 6 7
    // 8 9 10 11
    fn grid() -> Vec<i32> {
        (0..12).collect()
    }

    #[test]
    fn test_dense_layouts_read_same_buffer_differently() {
        let data = grid();
        let right = StridedView::<i32, LayoutRight>::from_slice(&data, &[3, 4]).unwrap();
        let left = StridedView::<i32, LayoutLeft>::from_slice(&data, &[4, 3]).unwrap();
        assert_eq!(right.get(&[1, 2]), 6);
        assert_eq!(left.get(&[2, 1]), 6);
        assert_eq!(right.extent(1), 4);
        assert_eq!(left.strides(), &[1, 4]);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        let data = grid();
        assert!(matches!(
            StridedView::<i32, LayoutRight>::from_slice(&data, &[5, 3]),
            Err(ViewError::LengthMismatch { expected: 15, got: 12 })
        ));
    }

    #[test]
    fn test_strided_sub_block() {
        let data = grid();
        // rows 1..3, columns 1 and 3
        let v = StridedView::<i32, LayoutStride>::new(&data, &[2, 2], &[4, 2], 5).unwrap();
        assert_eq!(v.offset(), 5);
        assert_eq!(v.len(), 4);
        assert_eq!([v.get(&[0, 0]), v.get(&[0, 1]), v.get(&[1, 0]), v.get(&[1, 1])], [5, 7, 9, 11]);
        assert_eq!(unsafe { *v.ptr() }, 5);
    }

    #[test]
    fn test_permute_is_a_transpose() {
        let data = grid();
        let v = StridedView::<i32, LayoutRight>::from_slice(&data, &[3, 4]).unwrap();
        let t = v.permute(&[1, 0]).unwrap();
        assert_eq!(t.dims(), &[4, 3]);
        assert_eq!(t.get(&[3, 2]), v.get(&[2, 3]));
        assert!(v.permute(&[1, 1]).is_err());
    }

    #[test]
    fn test_view_mut_writes_through() {
        let mut data = vec![0i32; 12];
        {
            let mut v = StridedViewMut::<i32, LayoutStride>::new(&mut data, &[3], &[-4], 8).unwrap();
            for i in 0..3 {
                v.set(&[i], i as i32 + 1);
            }
            assert_eq!(v.as_view().get(&[2]), 3);
        }
        assert_eq!((data[8], data[4], data[0]), (1, 2, 3));
    }

    #[test]
    fn test_zero_stride_is_shared_only() {
        let mut data = vec![7i32];
        let broadcast = StridedView::<i32, LayoutStride>::new(&data, &[4], &[0], 0).unwrap();
        assert_eq!(broadcast.get(&[3]), 7);
        assert!(matches!(
            StridedViewMut::<i32, LayoutStride>::new(&mut data, &[4], &[0], 0),
            Err(ViewError::Aliased { .. })
        ));
        let mut grid = grid();
        assert!(StridedViewMut::<i32, LayoutStride>::new(&mut grid, &[3, 3], &[2, 1], 0).is_err());
    }

    #[test]
    fn test_unmanaged_and_owned_views_agree() {
        let owned = StridedArray::<i32, LayoutRight>::from_vec(grid(), &[3, 4]).unwrap();
        let external = grid();
        let borrowed = StridedView::<i32, LayoutRight>::from_slice(&external, &[3, 4]).unwrap();
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(owned.view().get(&[i, j]), borrowed.get(&[i, j]));
            }
        }
    }

    #[test]
    fn test_from_fn_memory_order() {
        let mut calls = Vec::new();
        let a = StridedArray::<i32, LayoutLeft>::from_fn(&[2, 2], |ix| {
            calls.push(ix.to_vec());
            (10 * ix[0] + ix[1]) as i32
        });
        assert_eq!(calls, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
        assert_eq!(a.data(), &[0, 10, 1, 11]);
    }

    #[test]
    fn test_array_indexing_and_complex_elements() {
        let mut a = StridedArray::<Complex32>::new(&[2, 2]);
        a.set(&[1, 0], Complex32::new(1.0, -1.0));
        a[&[0usize, 1][..]] = Complex32::new(0.0, 2.0);
        assert_eq!(a.data()[2], Complex32::new(1.0, -1.0));
        assert_eq!(a.view_mut().get(&[0, 1]), Complex32::new(0.0, 2.0));
        assert_eq!(a.into_vec().len(), 4);
    }
}
