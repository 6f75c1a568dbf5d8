//! Compressed row storage (CRS) graphs and matrices, and the parallel engine
//! that puts them in canonical form.
//!
//! A CRS structure is a row map `row_map[0..=num_rows]` of offsets into an
//! entries array, plus (for matrices) a parallel values array. Canonical form
//! means each row's column indices are strictly increasing.
//!
//! # Operations
//!
//! | operation | effect |
//! |-----------|--------|
//! | [`sort_crs_graph`] / [`sort_crs_matrix`] | sort every row in place |
//! | [`sort_and_merge_graph`] / [`sort_and_merge_matrix`] | sort, then collapse duplicate columns into a new structure (values summed) |
//!
//! Each has a `*_with_exec` twin taking an explicit execution space, and the
//! same operations exist as methods of [`CrsGraph`] and [`CrsMatrix`]. The
//! raw forms take plain slices, so buffers owned by the caller (or by another
//! library) are sorted exactly like buffers owned by a [`CrsMatrix`].
//!
//! Rows are processed in parallel; a row longer than [`LONG_ROW_THRESHOLD`]
//! is additionally sorted with the execution space's parallel sort.
//!
//! # Example
//!
//! ```rust
//! use kernels_sparse::sort_and_merge_matrix;
//!
//! let row_map = vec![0, 4];
//! let mut entries = vec![4u32, 3, 5, 3];
//! let mut values = vec![1.5, 4.0, 1.0, -3.0];
//! let (rm, cols, vals) = sort_and_merge_matrix(&row_map, &mut entries, &mut values);
//! assert_eq!(rm, vec![0, 3]);
//! assert_eq!(cols, vec![3, 4, 5]);
//! assert_eq!(vals, vec![1.0, 1.5, 1.0]);
//! ```
//!
//! The hot path performs no validation of the row map; use
//! [`CrsGraph::new`] / [`CrsMatrix::new`] to validate untrusted input.

mod crs;
mod merge;
mod partition;
mod sort;

pub use crs::{CrsGraph, CrsMatrix};
pub use merge::{
    sort_and_merge_graph, sort_and_merge_graph_with_exec, sort_and_merge_matrix,
    sort_and_merge_matrix_with_exec,
};
pub use sort::{sort_crs_graph, sort_crs_graph_with_exec, sort_crs_matrix, sort_crs_matrix_with_exec};

/// Below this many entries a block of rows is processed without splitting.
pub const MIN_PARALLEL_NNZ: usize = 1 << 13;

/// Rows with at least this many entries are sorted with the execution
/// space's parallel sort.
pub const LONG_ROW_THRESHOLD: usize = 1 << 12;

/// Rows up to this length are sorted by insertion.
pub const INSERTION_SORT_MAX: usize = 16;

/// Errors raised when constructing a CRS structure from raw parts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SparseError {
    #[error("row map must start at 0, found {0}")]
    RowMapStart(usize),

    #[error("row map decreases at row {row}: {prev} > {next}")]
    RowMapNotMonotone { row: usize, prev: usize, next: usize },

    #[error("row map ends at {row_map_end} but there are {nnz} entries")]
    NnzMismatch { row_map_end: usize, nnz: usize },

    #[error("{values} values for {entries} entries")]
    ValuesLength { entries: usize, values: usize },

    #[error("column index at position {pos} is negative or not below {num_cols}")]
    ColumnOutOfRange { pos: usize, num_cols: usize },
}

/// Result type for CRS construction.
pub type Result<T> = std::result::Result<T, SparseError>;
