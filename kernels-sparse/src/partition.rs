//! Recursive row-range splitting.
//!
//! Row blocks are halved at the row that balances their entry counts and the
//! halves run through [`ExecutionSpace::join`]. Every buffer travelling with a
//! block is split at the same row, so each leaf owns disjoint slices of all
//! of them.

use kernels_exec::ExecutionSpace;

use crate::MIN_PARALLEL_NNZ;

/// A buffer that can be cut at a position.
pub(crate) trait SplitAt: Send + Sized {
    fn split_at(self, at: usize) -> (Self, Self);
}

impl<T: Sync> SplitAt for &[T] {
    fn split_at(self, at: usize) -> (Self, Self) {
        <[T]>::split_at(self, at)
    }
}

impl<T: Send> SplitAt for &mut [T] {
    fn split_at(self, at: usize) -> (Self, Self) {
        self.split_at_mut(at)
    }
}

impl SplitAt for () {
    fn split_at(self, _at: usize) -> (Self, Self) {
        ((), ())
    }
}

impl<A: SplitAt, B: SplitAt> SplitAt for (A, B) {
    fn split_at(self, at: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_at(at);
        let (b0, b1) = self.1.split_at(at);
        ((a0, b0), (a1, b1))
    }
}

/// Something that spans a contiguous range of rows.
pub(crate) trait RowBlock: Send + Sized {
    fn num_rows(&self) -> usize;

    /// Entries covered; drives the split point.
    fn nnz(&self) -> usize;

    /// Row index (local to this block) that splits its entries in half.
    fn balanced_mid(&self) -> usize {
        self.num_rows() / 2
    }

    /// Split into rows `[0, mid)` and `[mid, num_rows)`.
    fn split_rows(self, mid: usize) -> (Self, Self);
}

/// Data partitioned into rows by a row map window.
///
/// `row_map` holds `num_rows + 1` offsets; `data` covers entries
/// `row_map[0]..row_map[num_rows]`, so row `r` is
/// `row_map[r] - row_map[0]..row_map[r + 1] - row_map[0]` within it.
pub(crate) struct Rows<'a, D> {
    pub(crate) row_map: &'a [usize],
    pub(crate) data: D,
}

impl<'a, D> Rows<'a, D> {
    /// Local bounds of row `r`.
    #[inline]
    pub(crate) fn range(&self, r: usize) -> std::ops::Range<usize> {
        let base = self.row_map[0];
        self.row_map[r] - base..self.row_map[r + 1] - base
    }
}

impl<D: SplitAt> RowBlock for Rows<'_, D> {
    fn num_rows(&self) -> usize {
        self.row_map.len() - 1
    }

    fn nnz(&self) -> usize {
        self.row_map[self.row_map.len() - 1] - self.row_map[0]
    }

    fn balanced_mid(&self) -> usize {
        let rows = self.num_rows();
        let target = self.row_map[0] + self.nnz() / 2;
        self.row_map.partition_point(|&off| off < target).clamp(1, rows - 1)
    }

    fn split_rows(self, mid: usize) -> (Self, Self) {
        let at = self.row_map[mid] - self.row_map[0];
        let (d0, d1) = self.data.split_at(at);
        (
            Rows {
                row_map: &self.row_map[..=mid],
                data: d0,
            },
            Rows {
                row_map: &self.row_map[mid..],
                data: d1,
            },
        )
    }
}

/// One value per row.
pub(crate) struct PerRow<'a, T>(pub(crate) &'a mut [T]);

impl<T: Send> RowBlock for PerRow<'_, T> {
    fn num_rows(&self) -> usize {
        self.0.len()
    }

    fn nnz(&self) -> usize {
        0
    }

    fn split_rows(self, mid: usize) -> (Self, Self) {
        let (a, b) = self.0.split_at_mut(mid);
        (PerRow(a), PerRow(b))
    }
}

/// Two blocks over the same rows; the first one decides where to split.
impl<A: RowBlock, B: RowBlock> RowBlock for (A, B) {
    fn num_rows(&self) -> usize {
        self.0.num_rows()
    }

    fn nnz(&self) -> usize {
        self.0.nnz()
    }

    fn balanced_mid(&self) -> usize {
        self.0.balanced_mid()
    }

    fn split_rows(self, mid: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_rows(mid);
        let (b0, b1) = self.1.split_rows(mid);
        ((a0, b0), (a1, b1))
    }
}

/// Call `leaf(first_row, block)` on disjoint pieces covering `block`.
pub(crate) fn for_each_row_block<E, B, F>(exec: &E, block: B, leaf: &F)
where
    E: ExecutionSpace,
    B: RowBlock,
    F: Fn(usize, B) + Sync,
{
    split(exec, block, 0, exec.concurrency(), leaf);
}

fn split<E, B, F>(exec: &E, block: B, first_row: usize, nthreads: usize, leaf: &F)
where
    E: ExecutionSpace,
    B: RowBlock,
    F: Fn(usize, B) + Sync,
{
    if nthreads <= 1 || block.num_rows() <= 1 || block.nnz() <= MIN_PARALLEL_NNZ {
        leaf(first_row, block);
        return;
    }
    let mid = block.balanced_mid();
    let (left, right) = block.split_rows(mid);
    let nt_left = nthreads / 2;
    let nt_right = nthreads - nt_left;
    exec.join(
        || split(exec, left, first_row, nt_left, leaf),
        || split(exec, right, first_row + mid, nt_right, leaf),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use kernels_exec::Serial;

    #[test]
    fn test_balanced_mid_follows_entries() {
        // row 0 holds almost everything
        let row_map = [0, 90, 95, 100];
        let rows = Rows {
            row_map: &row_map,
            data: (),
        };
        assert_eq!(rows.balanced_mid(), 1);
        let even = [0, 10, 20, 30, 40];
        let rows = Rows {
            row_map: &even,
            data: (),
        };
        assert_eq!(rows.balanced_mid(), 2);
    }

    #[test]
    fn test_split_rows_keeps_offsets_consistent() {
        let row_map = [0, 2, 5, 6];
        let mut data = [10, 11, 20, 21, 22, 30];
        let rows = Rows {
            row_map: &row_map,
            data: &mut data[..],
        };
        let (l, r) = rows.split_rows(1);
        assert_eq!(l.data, &[10, 11]);
        assert_eq!(r.row_map, &[2, 5, 6]);
        assert_eq!(r.range(0), 0..3);
        assert_eq!(&r.data[r.range(1)], &[30]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_leaves_cover_all_rows_once() {
        let exec = kernels_exec::Threads::new(4).unwrap();
        let nrows = 5000;
        let row_map: Vec<usize> = (0..=nrows).map(|r| r * 7).collect();
        let mut counts = vec![0usize; nrows];
        let seen = Mutex::new(Vec::new());
        for_each_row_block(
            &exec,
            (
                Rows {
                    row_map: &row_map,
                    data: (),
                },
                PerRow(&mut counts),
            ),
            &|first, (rows, per_row): (Rows<'_, ()>, PerRow<'_, usize>)| {
                assert_eq!(rows.num_rows(), per_row.0.len());
                per_row.0.iter_mut().for_each(|c| *c += 1);
                seen.lock().unwrap().push((first, rows.num_rows()));
            },
        );
        assert!(counts.iter().all(|&c| c == 1));
        let mut blocks = seen.into_inner().unwrap();
        assert!(blocks.len() > 1);
        blocks.sort_unstable();
        let mut next = 0;
        for (first, n) in blocks {
            assert_eq!(first, next);
            next += n;
        }
        assert_eq!(next, nrows);
    }

    #[test]
    fn test_serial_is_one_leaf() {
        let row_map = [0, 1, 2, 3];
        let calls = Mutex::new(0);
        for_each_row_block(
            &Serial,
            Rows {
                row_map: &row_map,
                data: (),
            },
            &|first, _rows: Rows<'_, ()>| {
                assert_eq!(first, 0);
                *calls.lock().unwrap() += 1;
            },
        );
        assert_eq!(calls.into_inner().unwrap(), 1);
    }
}
