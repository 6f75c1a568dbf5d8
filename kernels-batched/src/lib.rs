//! Generic batched kernels.
//!
//! Reference bodies used when no vendor backend applies: [`SerialSet`] fills a
//! 2-D strided block on the calling thread, [`TeamSet`] splits the same work
//! across the members of a team. [`set`] and [`set_batched`] are the safe
//! view-level entry points, and [`pack_col_major`] / [`pack_row_major`] copy a
//! strided block into a dense buffer.

mod pack;
mod set;

pub use pack::{pack_col_major, pack_row_major};
pub use set::{set, set_batched, SerialSet, TeamSet};

use kernels_exec::ExecError;
use kernels_view::ViewError;

/// Errors raised by the batched kernels.
#[derive(Debug, thiserror::Error)]
pub enum BatchedError {
    /// The kernel needs a view of a specific rank.
    #[error("expected a rank-{expected} view, got rank {got}")]
    Rank { expected: usize, got: usize },

    /// A buffer is too short for the block described by its dims and strides.
    #[error("buffer of length {len} cannot hold a {m}x{n} block with strides ({s0}, {s1})")]
    OutOfBounds {
        len: usize,
        m: usize,
        n: usize,
        s0: usize,
        s1: usize,
    },

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Result type for batched kernels.
pub type Result<T> = std::result::Result<T, BatchedError>;

/// Check that every `i * s0 + j * s1` with `i < m`, `j < n` indexes `len`.
pub(crate) fn check_block(len: usize, m: usize, n: usize, s0: usize, s1: usize) -> Result<()> {
    if m == 0 || n == 0 {
        return Ok(());
    }
    let err = || BatchedError::OutOfBounds { len, m, n, s0, s1 };
    let last = (m - 1)
        .checked_mul(s0)
        .and_then(|a| (n - 1).checked_mul(s1).and_then(|b| a.checked_add(b)))
        .ok_or_else(err)?;
    if last >= len {
        return Err(err());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_block() {
        assert!(check_block(6, 2, 3, 3, 1).is_ok());
        assert!(check_block(5, 2, 3, 3, 1).is_err());
        assert!(check_block(0, 0, 3, 3, 1).is_ok());
        assert!(check_block(10, 2, 2, usize::MAX, 1).is_err());
    }
}
