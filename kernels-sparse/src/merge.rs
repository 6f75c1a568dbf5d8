//! Sort, then collapse duplicate columns within each row.
//!
//! Three phases, each a complete parallel region: count distinct columns per
//! row, exclusive scan of the counts into the output row map, then fill the
//! exactly-sized output. When no row had a duplicate the sorted input is
//! copied instead of refilled.

use kernels_exec::{parallel_exclusive_scan, DefaultExecutionSpace, ExecutionSpace};
use kernels_traits::{Ordinal, ScalarBase};

use crate::partition::{for_each_row_block, PerRow, Rows};
use crate::sort::{row_count, sort_crs_graph_with_exec, sort_crs_matrix_with_exec};

type MatrixRows<'m, 'd, I, T> = Rows<'m, (&'d [I], &'d [T])>;
type MatrixRowsMut<'m, 'd, I, T> = Rows<'m, (&'d mut [I], &'d mut [T])>;

/// Distinct values in a sorted row.
fn count_distinct<I: PartialEq>(cols: &[I]) -> usize {
    if cols.is_empty() {
        return 0;
    }
    1 + cols.windows(2).filter(|w| w[0] != w[1]).count()
}

fn merge_graph_row<I: Ordinal>(cols: &[I], out: &mut [I]) {
    let mut k = 0;
    for &c in cols {
        if k == 0 || out[k - 1] != c {
            out[k] = c;
            k += 1;
        }
    }
    debug_assert_eq!(k, out.len());
}

fn merge_matrix_row<I: Ordinal, T: ScalarBase>(
    cols: &[I],
    vals: &[T],
    out_cols: &mut [I],
    out_vals: &mut [T],
) {
    let mut k = 0;
    for (&c, &v) in cols.iter().zip(vals) {
        if k > 0 && out_cols[k - 1] == c {
            out_vals[k - 1] = out_vals[k - 1] + v;
        } else {
            out_cols[k] = c;
            out_vals[k] = v;
            k += 1;
        }
    }
    debug_assert_eq!(k, out_cols.len());
}

/// Per-row distinct counts of sorted `entries`, scanned into a new row map.
/// Returns the row map and the merged entry count.
fn merged_row_map<E, I>(exec: &E, row_map: &[usize], entries: &[I]) -> (Vec<usize>, usize)
where
    E: ExecutionSpace,
    I: Ordinal,
{
    let num_rows = row_map.len() - 1;
    let mut counts = vec![0usize; num_rows];
    let block = (
        Rows {
            row_map,
            data: entries,
        },
        PerRow(&mut counts),
    );
    for_each_row_block(exec, block, &|_, (rows, counts): (Rows<'_, &[I]>, PerRow<'_, usize>)| {
        for (r, count) in counts.0.iter_mut().enumerate() {
            *count = count_distinct(&rows.data[rows.range(r)]);
        }
    });
    let mut out_map = vec![0usize; num_rows + 1];
    let total = parallel_exclusive_scan(exec, &counts, &mut out_map);
    (out_map, total)
}

/// Sort `entries` in place, then return a new graph with duplicate columns
/// removed from every row.
///
/// The returned row map has the same length as `row_map`.
pub fn sort_and_merge_graph<I: Ordinal>(row_map: &[usize], entries: &mut [I]) -> (Vec<usize>, Vec<I>) {
    sort_and_merge_graph_with_exec(&DefaultExecutionSpace::default(), row_map, entries)
}

/// [`sort_and_merge_graph`] on an explicit execution space.
pub fn sort_and_merge_graph_with_exec<E, I>(
    exec: &E,
    row_map: &[usize],
    entries: &mut [I],
) -> (Vec<usize>, Vec<I>)
where
    E: ExecutionSpace,
    I: Ordinal,
{
    sort_crs_graph_with_exec(exec, row_map, entries);
    let Some(num_rows) = row_count(row_map) else {
        return (Vec::new(), Vec::new());
    };
    let entries = &entries[row_map[0]..row_map[num_rows]];
    let nnz = entries.len();
    let (out_map, total) = merged_row_map(exec, row_map, entries);
    tracing::debug!(num_rows, nnz, merged = total, exec = E::NAME, "sort_and_merge_graph");
    if total == nnz {
        return (out_map, entries.to_vec());
    }

    let mut out_entries = vec![entries[0]; total];
    let block = (
        Rows {
            row_map,
            data: entries,
        },
        Rows {
            row_map: &out_map,
            data: &mut out_entries[..],
        },
    );
    for_each_row_block(
        exec,
        block,
        &|_, (inp, out): (Rows<'_, &[I]>, Rows<'_, &mut [I]>)| {
            for r in 0..inp.row_map.len() - 1 {
                let dst = out.range(r);
                merge_graph_row(&inp.data[inp.range(r)], &mut out.data[dst]);
            }
        },
    );
    (out_map, out_entries)
}

/// Sort `entries`/`values` in place, then return a new matrix in which each
/// row holds every column once, with the values of duplicates summed.
///
/// The returned row map has the same length as `row_map`.
pub fn sort_and_merge_matrix<I, T>(
    row_map: &[usize],
    entries: &mut [I],
    values: &mut [T],
) -> (Vec<usize>, Vec<I>, Vec<T>)
where
    I: Ordinal,
    T: ScalarBase,
{
    sort_and_merge_matrix_with_exec(&DefaultExecutionSpace::default(), row_map, entries, values)
}

/// [`sort_and_merge_matrix`] on an explicit execution space.
pub fn sort_and_merge_matrix_with_exec<E, I, T>(
    exec: &E,
    row_map: &[usize],
    entries: &mut [I],
    values: &mut [T],
) -> (Vec<usize>, Vec<I>, Vec<T>)
where
    E: ExecutionSpace,
    I: Ordinal,
    T: ScalarBase,
{
    sort_crs_matrix_with_exec(exec, row_map, entries, values);
    let Some(num_rows) = row_count(row_map) else {
        return (Vec::new(), Vec::new(), Vec::new());
    };
    let (start, end) = (row_map[0], row_map[num_rows]);
    let (entries, values) = (&entries[start..end], &values[start..end]);
    let nnz = entries.len();
    let (out_map, total) = merged_row_map(exec, row_map, entries);
    tracing::debug!(num_rows, nnz, merged = total, exec = E::NAME, "sort_and_merge_matrix");
    if total == nnz {
        return (out_map, entries.to_vec(), values.to_vec());
    }

    let mut out_entries = vec![entries[0]; total];
    let mut out_values = vec![T::zero(); total];
    let block = (
        Rows {
            row_map,
            data: (entries, values),
        },
        Rows {
            row_map: &out_map,
            data: (&mut out_entries[..], &mut out_values[..]),
        },
    );
    for_each_row_block(exec, block, &|_, (inp, out): (MatrixRows<'_, '_, I, T>, MatrixRowsMut<'_, '_, I, T>)| {
        let (in_base, out_base) = (inp.row_map[0], out.row_map[0]);
        let (cols, vals) = inp.data;
        let (out_cols, out_vals) = out.data;
        for (w, o) in inp.row_map.windows(2).zip(out.row_map.windows(2)) {
            let src = w[0] - in_base..w[1] - in_base;
            let dst = o[0] - out_base..o[1] - out_base;
            merge_matrix_row(
                &cols[src.clone()],
                &vals[src],
                &mut out_cols[dst.clone()],
                &mut out_vals[dst],
            );
        }
    });
    (out_map, out_entries, out_values)
}
