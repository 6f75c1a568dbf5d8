//! Exclusive prefix sums over execution spaces.

use crate::ExecutionSpace;

/// Below this many inputs the scan runs sequentially.
const SCAN_MIN_PARALLEL: usize = 1 << 14;

/// Write the exclusive prefix sum of `counts` into `out` and return the total.
///
/// `out` must hold `counts.len() + 1` elements: `out[0] = 0` and
/// `out[i + 1] = counts[0] + ... + counts[i]`.
///
/// # Panics
/// Panics if `out.len() != counts.len() + 1`.
pub fn parallel_exclusive_scan<E: ExecutionSpace>(
    exec: &E,
    counts: &[usize],
    out: &mut [usize],
) -> usize {
    assert_eq!(
        out.len(),
        counts.len() + 1,
        "scan output must be one longer than its input"
    );
    out[0] = 0;
    let n = counts.len();
    let nthreads = exec.concurrency();
    if nthreads <= 1 || n < SCAN_MIN_PARALLEL {
        let mut acc = 0usize;
        for (o, &c) in out[1..].iter_mut().zip(counts) {
            acc += c;
            *o = acc;
        }
        return acc;
    }

    let chunk = n.div_ceil(4 * nthreads);
    let tail = &mut out[1..];

    // Local inclusive sums per chunk.
    for_each_chunk_mut(exec, tail, chunk, 0, &|ci, block| {
        let start = ci * chunk;
        let mut acc = 0usize;
        for (o, &c) in block.iter_mut().zip(&counts[start..]) {
            acc += c;
            *o = acc;
        }
    });

    // Carry-in per chunk from the last element of each preceding chunk.
    let nchunks = n.div_ceil(chunk);
    let mut carries = Vec::with_capacity(nchunks);
    let mut carry = 0usize;
    for ci in 0..nchunks {
        carries.push(carry);
        let last = ((ci + 1) * chunk).min(n) - 1;
        carry += tail[last];
    }

    for_each_chunk_mut(exec, tail, chunk, 0, &|ci, block| {
        let c = carries[ci];
        if c != 0 {
            block.iter_mut().for_each(|o| *o += c);
        }
    });
    carry
}

/// Split `data` into `chunk`-sized blocks and call `f(chunk_index, block)`
/// for each, recursing through [`ExecutionSpace::join`].
fn for_each_chunk_mut<E, T, F>(exec: &E, data: &mut [T], chunk: usize, first: usize, f: &F)
where
    E: ExecutionSpace,
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let nchunks = data.len().div_ceil(chunk);
    if nchunks <= 1 {
        if !data.is_empty() {
            f(first, data);
        }
        return;
    }
    let left_chunks = nchunks / 2;
    let (left, right) = data.split_at_mut(left_chunks * chunk);
    exec.join(
        || for_each_chunk_mut(exec, left, chunk, first, f),
        || for_each_chunk_mut(exec, right, chunk, first + left_chunks, f),
    );
}
