//! Shared traits for the kernels workspace.
//!
//! This crate provides the trait definitions shared across `kernels-view`,
//! `kernels-exec`, `kernels-blas` and `kernels-sparse`. Every axis of a
//! dispatch signature (scalar type, memory layout, memory space) is described
//! by a trait carrying a `const` kind tag, so that backend availability can be
//! decided from types alone.
//!
//! External crates can depend on `kernels-traits` to implement these traits
//! for their own types without orphan rule violations.

pub mod layout;
pub mod memory;
pub mod ordinal;
pub mod scalar;

pub use layout::{
    col_major_strides, row_major_strides, ContiguousLayout, Layout, LayoutKind, LayoutLeft,
    LayoutRight, LayoutStride,
};
pub use memory::{HostSpace, MemKind, MemorySpace};
pub use ordinal::Ordinal;
pub use scalar::{Scalar, ScalarBase, ScalarKind};
