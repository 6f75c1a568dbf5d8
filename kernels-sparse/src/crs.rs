//! Owned CRS graph and matrix types.

use kernels_exec::{DefaultExecutionSpace, ExecutionSpace};
use kernels_traits::{Ordinal, ScalarBase};

use crate::merge::{sort_and_merge_graph_with_exec, sort_and_merge_matrix_with_exec};
use crate::sort::{sort_crs_graph_with_exec, sort_crs_matrix_with_exec};
use crate::{Result, SparseError};

fn validate_row_map(row_map: &[usize], nnz: usize) -> Result<()> {
    let Some(&first) = row_map.first() else {
        return if nnz == 0 {
            Ok(())
        } else {
            Err(SparseError::NnzMismatch { row_map_end: 0, nnz })
        };
    };
    if first != 0 {
        return Err(SparseError::RowMapStart(first));
    }
    for (row, w) in row_map.windows(2).enumerate() {
        if w[0] > w[1] {
            return Err(SparseError::RowMapNotMonotone {
                row,
                prev: w[0],
                next: w[1],
            });
        }
    }
    let end = row_map[row_map.len() - 1];
    if end != nnz {
        return Err(SparseError::NnzMismatch { row_map_end: end, nnz });
    }
    Ok(())
}

/// Sparsity pattern in compressed row storage.
///
/// A graph with no rows may have an empty row map or the row map `[0]`;
/// both are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrsGraph<I = i32> {
    row_map: Vec<usize>,
    entries: Vec<I>,
}

impl<I: Ordinal> CrsGraph<I> {
    /// Build a graph, checking that `row_map` starts at 0, never decreases
    /// and ends at `entries.len()`. Column order is not checked.
    pub fn new(row_map: Vec<usize>, entries: Vec<I>) -> Result<Self> {
        validate_row_map(&row_map, entries.len())?;
        Ok(Self { row_map, entries })
    }

    pub(crate) fn from_parts_unchecked(row_map: Vec<usize>, entries: Vec<I>) -> Self {
        Self { row_map, entries }
    }

    pub fn num_rows(&self) -> usize {
        self.row_map.len().saturating_sub(1)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn row_map(&self) -> &[usize] {
        &self.row_map
    }

    pub fn entries(&self) -> &[I] {
        &self.entries
    }

    /// Column indices of row `r`.
    pub fn row(&self, r: usize) -> &[I] {
        &self.entries[self.row_map[r]..self.row_map[r + 1]]
    }

    /// Whether every row is strictly increasing.
    pub fn is_sorted(&self) -> bool {
        (0..self.num_rows()).all(|r| self.row(r).windows(2).all(|w| w[0] < w[1]))
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<I>) {
        (self.row_map, self.entries)
    }

    /// Sort every row in place.
    pub fn sort(&mut self) {
        self.sort_with_exec(&DefaultExecutionSpace::default());
    }

    pub fn sort_with_exec<E: ExecutionSpace>(&mut self, exec: &E) {
        sort_crs_graph_with_exec(exec, &self.row_map, &mut self.entries);
    }

    /// Sort in place and return a copy with duplicate columns removed.
    pub fn sort_and_merge(&mut self) -> CrsGraph<I> {
        self.sort_and_merge_with_exec(&DefaultExecutionSpace::default())
    }

    pub fn sort_and_merge_with_exec<E: ExecutionSpace>(&mut self, exec: &E) -> CrsGraph<I> {
        let (row_map, entries) = sort_and_merge_graph_with_exec(exec, &self.row_map, &mut self.entries);
        CrsGraph::from_parts_unchecked(row_map, entries)
    }
}

/// Sparse matrix in compressed row storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsMatrix<T, I = i32> {
    graph: CrsGraph<I>,
    values: Vec<T>,
    num_cols: usize,
}

impl<T: ScalarBase, I: Ordinal> CrsMatrix<T, I> {
    /// Build a matrix, validating the row map as [`CrsGraph::new`] does and
    /// checking that `values` matches `entries` and every column index lies
    /// in `0..num_cols`.
    pub fn new(num_cols: usize, row_map: Vec<usize>, entries: Vec<I>, values: Vec<T>) -> Result<Self> {
        let graph = CrsGraph::new(row_map, entries)?;
        Self::from_graph_and_values(graph, values, num_cols)
    }

    /// A matrix with the pattern of `graph` and all values zero.
    pub fn from_graph(graph: CrsGraph<I>, num_cols: usize) -> Result<Self> {
        let values = vec![T::zero(); graph.nnz()];
        Self::from_graph_and_values(graph, values, num_cols)
    }

    fn from_graph_and_values(graph: CrsGraph<I>, values: Vec<T>, num_cols: usize) -> Result<Self> {
        if values.len() != graph.nnz() {
            return Err(SparseError::ValuesLength {
                entries: graph.nnz(),
                values: values.len(),
            });
        }
        if let Some(pos) = graph
            .entries
            .iter()
            .position(|c| c.to_usize().map_or(true, |c| c >= num_cols))
        {
            return Err(SparseError::ColumnOutOfRange { pos, num_cols });
        }
        Ok(Self {
            graph,
            values,
            num_cols,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.graph.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn graph(&self) -> &CrsGraph<I> {
        &self.graph
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Column indices and values of row `r`.
    pub fn row(&self, r: usize) -> (&[I], &[T]) {
        let range = self.graph.row_map[r]..self.graph.row_map[r + 1];
        (&self.graph.entries[range.clone()], &self.values[range])
    }

    /// `(row_map, entries, values)`.
    pub fn into_parts(self) -> (Vec<usize>, Vec<I>, Vec<T>) {
        let (row_map, entries) = self.graph.into_parts();
        (row_map, entries, self.values)
    }

    /// Sort every row by column in place.
    pub fn sort(&mut self) {
        self.sort_with_exec(&DefaultExecutionSpace::default());
    }

    pub fn sort_with_exec<E: ExecutionSpace>(&mut self, exec: &E) {
        sort_crs_matrix_with_exec(exec, &self.graph.row_map, &mut self.graph.entries, &mut self.values);
    }

    /// Sort in place and return a matrix with duplicate columns summed.
    /// The result has the same number of rows and columns.
    pub fn sort_and_merge(&mut self) -> CrsMatrix<T, I> {
        self.sort_and_merge_with_exec(&DefaultExecutionSpace::default())
    }

    pub fn sort_and_merge_with_exec<E: ExecutionSpace>(&mut self, exec: &E) -> CrsMatrix<T, I> {
        let (row_map, entries, values) = sort_and_merge_matrix_with_exec(
            exec,
            &self.graph.row_map,
            &mut self.graph.entries,
            &mut self.values,
        );
        CrsMatrix {
            graph: CrsGraph::from_parts_unchecked(row_map, entries),
            values,
            num_cols: self.num_cols,
        }
    }
}
