//! Portable linear-algebra kernels.
//!
//! This crate re-exports the workspace members under one roof:
//!
//! - [`traits`]: scalar, layout and memory-space tags shared by everything
//!   else, plus the [`Ordinal`] column-index trait
//! - [`view`]: strided views tagged with layout and memory space
//! - [`exec`]: execution spaces ([`Serial`], `Threads`), flat and team
//!   parallel loops, parallel exclusive scan
//! - [`batched`]: serial and team `set` kernels and pack helpers
//! - [`blas`]: BLAS1 `rotm`/`rot` with compile-time backend dispatch
//! - [`sparse`]: CRS graphs and matrices with parallel sort and
//!   sort-and-merge
//!
//! # Features
//!
//! - `parallel` (default): rayon-backed `Threads` becomes the
//!   [`DefaultExecutionSpace`]
//! - `blas`: route `f32`/`f64` rotations on host layouts to CBLAS
//! - `cublas`, `rocblas`: enable the device registry partitions
//!
//! # Example
//!
//! ```rust
//! use kernels::{CrsMatrix, Serial};
//!
//! let mut a = CrsMatrix::<f64>::new(
//!     6,
//!     vec![0, 4],
//!     vec![4, 3, 5, 3],
//!     vec![1.5, 4.0, 1.0, -3.0],
//! )
//! .unwrap();
//! let merged = a.sort_and_merge_with_exec(&Serial);
//! assert_eq!(merged.row(0), (&[3, 4, 5][..], &[1.0, 1.5, 1.0][..]));
//! ```

pub use kernels_batched as batched;
pub use kernels_blas as blas;
pub use kernels_exec as exec;
pub use kernels_sparse as sparse;
pub use kernels_traits as traits;
pub use kernels_view as view;

#[cfg(feature = "parallel")]
pub use kernels_exec::Threads;
pub use kernels_exec::{DefaultExecutionSpace, ExecutionSpace, Serial};
pub use kernels_sparse::{CrsGraph, CrsMatrix};
pub use kernels_traits::{
    HostSpace, LayoutLeft, LayoutRight, LayoutStride, Ordinal, Scalar, ScalarBase,
};
pub use kernels_view::{StridedArray, StridedView, StridedViewMut};
