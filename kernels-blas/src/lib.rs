//! BLAS1 rotations with compile-time backend dispatch.
//!
//! Every operation in this crate is resolved against a backend registry for
//! its dispatch [`Signature`]: execution space, scalar type, layout and
//! memory space. When a backend enabled in [`BuildConfig::ACTIVE`] registers
//! the signature, the call is forwarded to the vendor routine; otherwise the
//! portable body runs on the given execution space. The decision is a
//! constant of the signature type, so there is no runtime check.
//!
//! # Backend Selection
//!
//! | Feature   | Backend                            |
//! |-----------|------------------------------------|
//! | `blas`    | host CBLAS via `cblas-sys`         |
//! | `cublas`  | cuBLAS partition (registry only)   |
//! | `rocblas` | rocBLAS partition (registry only)  |
//!
//! Backends coexist: each owns its own partition of every registry, and a
//! signature registered twice fails to compile.

pub mod backend;
pub mod dispatch;
mod generic;
#[cfg(feature = "blas")]
mod host;
mod rotation;

pub use backend::{BackendId, BuildConfig};
pub use dispatch::{
    is_rot_available, is_rotm_available, registry, Operation, Partition, Registry, Signature,
    SignatureKey, ROTM_REGISTRY, ROT_REGISTRY,
};
pub use rotation::{rot, rotm};

use kernels_view::ViewError;

/// Errors raised by the BLAS entry points.
#[derive(Debug, thiserror::Error)]
pub enum BlasError {
    #[error("vector lengths differ: x has {x} elements, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("expected a rank-{expected} view, got rank {got}")]
    Rank { expected: usize, got: usize },

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type for BLAS operations.
pub type Result<T> = std::result::Result<T, BlasError>;
