//! Execution spaces for the kernels workspace.
//!
//! An [`ExecutionSpace`] decides where fork-join work runs. [`Serial`] runs
//! everything on the calling thread; [`Threads`] (behind the `parallel`
//! feature) runs on a rayon pool. Kernels written against the trait use
//! [`ExecutionSpace::join`] for recursive splitting,
//! [`ExecutionSpace::parallel_for`] for flat loops,
//! [`parallel_exclusive_scan`] for prefix sums and [`parallel_for_team`] for
//! team-level loops with a barrier.

mod scan;
mod space;
mod team;

pub use scan::parallel_exclusive_scan;
pub use space::{DefaultExecutionSpace, ExecKind, ExecutionSpace, Serial, MIN_PARALLEL_LEN};
#[cfg(feature = "parallel")]
pub use space::Threads;
pub use team::{parallel_for_team, TeamMember, TeamPolicy};

/// Errors raised while configuring an execution space.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("team size must be at least 1")]
    InvalidTeamSize,

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[cfg(feature = "parallel")]
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias for `Result<T, ExecError>`.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Raw pointer that may cross into worker closures.
///
/// # Safety
/// Whoever dereferences it must ensure the target outlives the parallel
/// region and that concurrent tasks touch disjoint elements.
#[derive(Debug)]
pub struct SendPtr<T>(pub *mut T);

impl<T> Copy for SendPtr<T> {}

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

// SAFETY: see the type-level contract.
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.0
    }
}
