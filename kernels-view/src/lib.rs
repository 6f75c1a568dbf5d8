//! Strided view types used to pass buffers across kernel boundaries.
//!
//! # Core Types
//!
//! - [`StridedView`] / [`StridedViewMut`]: non-owning strided views over
//!   existing data (the "unmanaged" case)
//! - [`StridedArray`]: owned contiguous array in a [`ContiguousLayout`]
//!
//! Every view carries its [`Layout`] and [`MemorySpace`] as type parameters,
//! so a view's type is enough to form a backend dispatch signature.
//!
//! # Example
//!
//! ```rust
//! use kernels_view::{create_mirror_view_and_copy, LayoutRight, StridedArray, StridedView};
//!
//! let buf: Vec<f32> = (0..6).map(|x| x as f32).collect();
//! let view = StridedView::<f32, LayoutRight>::from_slice(&buf, &[2, 3]).unwrap();
//! assert_eq!(view.extent(1), 3);
//! assert_eq!(view.get(&[1, 2]), 5.0);
//!
//! // a transpose is just another stride order; the mirror is dense again
//! let mirror: StridedArray<f32> = create_mirror_view_and_copy(&view.permute(&[1, 0]).unwrap());
//! assert_eq!(mirror.dims(), &[3, 2]);
//! assert_eq!(mirror.data(), &[0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
//! ```

mod mirror;
mod shape;
pub mod view;

pub use kernels_traits::{
    col_major_strides, row_major_strides, ContiguousLayout, HostSpace, Layout, LayoutKind,
    LayoutLeft, LayoutRight, LayoutStride, MemKind, MemorySpace,
};
pub use mirror::{create_mirror_view_and_copy, deep_copy};
pub use shape::Shape;
pub use view::{StridedArray, StridedView, StridedViewMut};

/// Errors raised while building or combining views.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("{strides} strides given for {dims} dimensions")]
    StrideCount { dims: usize, strides: usize },

    /// Some element of the requested view lies outside the buffer.
    #[error("view reaches outside its buffer of {len} elements")]
    OutOfBounds { len: usize },

    /// A dense view or array needs exactly as many elements as its shape.
    #[error("shape needs {expected} elements, buffer has {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("{perm:?} is not a permutation of 0..{rank}")]
    BadPermutation { perm: Vec<usize>, rank: usize },

    /// Two in-range indices of a mutable view reach the same element.
    #[error("strides {strides:?} over dims {dims:?} map distinct indices to one element")]
    Aliased { dims: Vec<usize>, strides: Vec<isize> },

    #[error("shapes differ: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
