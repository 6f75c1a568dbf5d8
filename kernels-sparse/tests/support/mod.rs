//! Random CRS inputs and host reference results.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Raw CRS buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    pub num_cols: usize,
    pub row_map: Vec<usize>,
    pub entries: Vec<i32>,
    pub values: Vec<f64>,
}

impl Crs {
    pub fn num_rows(&self) -> usize {
        self.row_map.len().saturating_sub(1)
    }
}

/// Split `nnz` entries over `num_rows` rows at random, no row above `cap`.
fn random_row_lengths(rng: &mut StdRng, num_rows: usize, nnz: usize, cap: usize) -> Vec<usize> {
    assert!(nnz <= num_rows.saturating_mul(cap), "too many entries for the shape");
    let mut lens = vec![0usize; num_rows];
    let mut open: Vec<usize> = (0..num_rows).collect();
    for _ in 0..nnz {
        let k = rng.gen_range(0..open.len());
        let r = open[k];
        lens[r] += 1;
        if lens[r] == cap {
            open.swap_remove(k);
        }
    }
    lens
}

fn row_map_from_lengths(lens: &[usize]) -> Vec<usize> {
    let mut row_map = Vec::with_capacity(lens.len() + 1);
    row_map.push(0);
    for &l in lens {
        row_map.push(row_map[row_map.len() - 1] + l);
    }
    row_map
}

/// A matrix whose rows hold distinct columns in shuffled order.
pub fn random_unsorted(rng: &mut StdRng, num_rows: usize, num_cols: usize, nnz: usize) -> Crs {
    let lens = random_row_lengths(rng, num_rows, nnz, num_cols);
    let row_map = row_map_from_lengths(&lens);
    let mut entries = Vec::with_capacity(nnz);
    for &len in &lens {
        let mut cols: Vec<i32> = rand::seq::index::sample(rng, num_cols, len)
            .into_iter()
            .map(|c| c as i32)
            .collect();
        cols.shuffle(rng);
        entries.extend(cols);
    }
    let values = (0..nnz).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Crs {
        num_cols,
        row_map,
        entries,
        values,
    }
}

/// A matrix whose rows draw columns with replacement, so duplicates are
/// common. Values are small integers, which sum exactly in `f64`.
pub fn random_with_duplicates(rng: &mut StdRng, num_rows: usize, num_cols: usize, nnz: usize) -> Crs {
    let lens = random_row_lengths(rng, num_rows, nnz, usize::MAX);
    let row_map = row_map_from_lengths(&lens);
    let entries = (0..nnz).map(|_| rng.gen_range(0..num_cols as i32)).collect();
    let values = (0..nnz).map(|_| rng.gen_range(-8i32..8) as f64).collect();
    Crs {
        num_cols,
        row_map,
        entries,
        values,
    }
}

/// Row-by-row host sort of `(column, value)` pairs.
pub fn reference_sort(crs: &Crs) -> (Vec<i32>, Vec<f64>) {
    let mut entries = crs.entries.clone();
    let mut values = crs.values.clone();
    for w in crs.row_map.windows(2) {
        let mut row: Vec<(i32, f64)> = (w[0]..w[1]).map(|k| (entries[k], values[k])).collect();
        row.sort_by_key(|p| p.0);
        for (j, (c, v)) in row.into_iter().enumerate() {
            entries[w[0] + j] = c;
            values[w[0] + j] = v;
        }
    }
    (entries, values)
}

/// Row-by-row host merge using an ordered map.
pub fn reference_merge(crs: &Crs) -> (Vec<usize>, Vec<i32>, Vec<f64>) {
    let mut row_map = vec![0];
    let mut entries = Vec::new();
    let mut values = Vec::new();
    for w in crs.row_map.windows(2) {
        let mut row = std::collections::BTreeMap::new();
        for k in w[0]..w[1] {
            *row.entry(crs.entries[k]).or_insert(0.0) += crs.values[k];
        }
        for (c, v) in row {
            entries.push(c);
            values.push(v);
        }
        row_map.push(entries.len());
    }
    if crs.row_map.is_empty() {
        row_map.clear();
    }
    (row_map, entries, values)
}
