//! In-place per-row sorting.

use kernels_exec::{DefaultExecutionSpace, ExecutionSpace};
use kernels_traits::Ordinal;

use crate::partition::{for_each_row_block, Rows};
use crate::{INSERTION_SORT_MAX, LONG_ROW_THRESHOLD};

fn insertion_sort<I: Ord + Copy>(cols: &mut [I]) {
    for i in 1..cols.len() {
        let c = cols[i];
        let mut j = i;
        while j > 0 && cols[j - 1] > c {
            cols[j] = cols[j - 1];
            j -= 1;
        }
        cols[j] = c;
    }
}

/// Stable insertion sort of `cols`, applying the same moves to `vals`.
fn insertion_sort_pairs<I: Ord + Copy, T: Copy>(cols: &mut [I], vals: &mut [T]) {
    for i in 1..cols.len() {
        let (c, v) = (cols[i], vals[i]);
        let mut j = i;
        while j > 0 && cols[j - 1] > c {
            cols[j] = cols[j - 1];
            vals[j] = vals[j - 1];
            j -= 1;
        }
        cols[j] = c;
        vals[j] = v;
    }
}

#[inline]
fn is_sorted<I: Ord>(cols: &[I]) -> bool {
    cols.windows(2).all(|w| w[0] <= w[1])
}

pub(crate) fn sort_graph_row<E: ExecutionSpace, I: Ordinal>(exec: &E, cols: &mut [I]) {
    let n = cols.len();
    if n <= INSERTION_SORT_MAX {
        insertion_sort(cols);
    } else if !is_sorted(cols) {
        if n >= LONG_ROW_THRESHOLD {
            tracing::trace!(len = n, exec = E::NAME, "parallel sort of long row");
            exec.sort_unstable(cols);
        } else {
            cols.sort_unstable();
        }
    }
}

/// Sort one matrix row by column, stably. `buf` is scratch space reused
/// across rows.
pub(crate) fn sort_matrix_row<E, I, T>(exec: &E, cols: &mut [I], vals: &mut [T], buf: &mut Vec<(I, T)>)
where
    E: ExecutionSpace,
    I: Ordinal,
    T: Copy + Send + Sync,
{
    let n = cols.len();
    if n <= INSERTION_SORT_MAX {
        insertion_sort_pairs(cols, vals);
        return;
    }
    if is_sorted(cols) {
        return;
    }
    buf.clear();
    buf.extend(cols.iter().copied().zip(vals.iter().copied()));
    if n >= LONG_ROW_THRESHOLD {
        tracing::trace!(len = n, exec = E::NAME, "parallel sort of long row");
        exec.sort_by_key(buf, |p| p.0);
    } else {
        buf.sort_by_key(|p| p.0);
    }
    for (k, (c, v)) in buf.drain(..).enumerate() {
        cols[k] = c;
        vals[k] = v;
    }
}

/// Number of rows described by `row_map`, or `None` for an empty row map.
pub(crate) fn row_count(row_map: &[usize]) -> Option<usize> {
    row_map.len().checked_sub(1)
}

/// Sort the column indices of every row of a graph in place.
pub fn sort_crs_graph<I: Ordinal>(row_map: &[usize], entries: &mut [I]) {
    sort_crs_graph_with_exec(&DefaultExecutionSpace::default(), row_map, entries);
}

/// [`sort_crs_graph`] on an explicit execution space.
pub fn sort_crs_graph_with_exec<E, I>(exec: &E, row_map: &[usize], entries: &mut [I])
where
    E: ExecutionSpace,
    I: Ordinal,
{
    let Some(num_rows) = row_count(row_map) else {
        return;
    };
    let (start, end) = (row_map[0], row_map[num_rows]);
    tracing::debug!(num_rows, nnz = end - start, exec = E::NAME, "sort_crs_graph");
    if num_rows == 0 {
        return;
    }
    let block = Rows {
        row_map,
        data: &mut entries[start..end],
    };
    for_each_row_block(exec, block, &|_, rows: Rows<'_, &mut [I]>| {
        for r in 0..rows.row_map.len() - 1 {
            let range = rows.range(r);
            sort_graph_row(exec, &mut rows.data[range]);
        }
    });
}

/// Sort every row of a matrix by column in place, permuting values with
/// their columns. Entries sharing a column keep their relative order.
pub fn sort_crs_matrix<I, T>(row_map: &[usize], entries: &mut [I], values: &mut [T])
where
    I: Ordinal,
    T: Copy + Send + Sync,
{
    sort_crs_matrix_with_exec(&DefaultExecutionSpace::default(), row_map, entries, values);
}

/// [`sort_crs_matrix`] on an explicit execution space.
///
/// # Panics
/// Panics if `entries` and `values` cover fewer than `row_map[num_rows]`
/// elements.
pub fn sort_crs_matrix_with_exec<E, I, T>(exec: &E, row_map: &[usize], entries: &mut [I], values: &mut [T])
where
    E: ExecutionSpace,
    I: Ordinal,
    T: Copy + Send + Sync,
{
    let Some(num_rows) = row_count(row_map) else {
        return;
    };
    let (start, end) = (row_map[0], row_map[num_rows]);
    tracing::debug!(num_rows, nnz = end - start, exec = E::NAME, "sort_crs_matrix");
    if num_rows == 0 {
        return;
    }
    let block = Rows {
        row_map,
        data: (&mut entries[start..end], &mut values[start..end]),
    };
    for_each_row_block(exec, block, &|_, rows: Rows<'_, (&mut [I], &mut [T])>| {
        let base = rows.row_map[0];
        let (cols, vals) = rows.data;
        let mut buf = Vec::new();
        for w in rows.row_map.windows(2) {
            let range = w[0] - base..w[1] - base;
            sort_matrix_row(exec, &mut cols[range.clone()], &mut vals[range], &mut buf);
        }
    });
}
