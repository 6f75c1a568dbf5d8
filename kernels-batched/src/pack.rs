use crate::{check_block, Result};

/// Copy the `m x n` block of `b` with strides `(bs0, bs1)` into `a` in
/// column-major order (`a[i + j*m]`).
pub fn pack_col_major<T: Copy>(
    a: &mut [T],
    m: usize,
    n: usize,
    b: &[T],
    bs0: usize,
    bs1: usize,
) -> Result<()> {
    check_block(b.len(), m, n, bs0, bs1)?;
    check_block(a.len(), m, n, 1, m)?;
    for j in 0..n {
        for i in 0..m {
            a[i + j * m] = b[i * bs0 + j * bs1];
        }
    }
    Ok(())
}

/// Copy the `m x n` block of `b` with strides `(bs0, bs1)` into `a` in
/// row-major order (`a[i*n + j]`).
pub fn pack_row_major<T: Copy>(
    a: &mut [T],
    m: usize,
    n: usize,
    b: &[T],
    bs0: usize,
    bs1: usize,
) -> Result<()> {
    check_block(b.len(), m, n, bs0, bs1)?;
    check_block(a.len(), m, n, n, 1)?;
    for i in 0..m {
        for j in 0..n {
            a[i * n + j] = b[i * bs0 + j * bs1];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BatchedError;

    // 3x4 row-major source: b[i][j] = 10*i + j
    fn source() -> Vec<i32> {
        (0..3).flat_map(|i| (0..4).map(move |j| 10 * i + j)).collect()
    }

    #[test]
    fn test_pack_col_major_transposes_memory_order() {
        let b = source();
        let mut a = vec![0; 12];
        pack_col_major(&mut a, 3, 4, &b, 4, 1).unwrap();
        assert_eq!(a, vec![0, 10, 20, 1, 11, 21, 2, 12, 22, 3, 13, 23]);
    }

    #[test]
    fn test_pack_row_major_sub_block() {
        let b = source();
        let mut a = vec![0; 4];
        // rows 0..2, every other column
        pack_row_major(&mut a, 2, 2, &b, 4, 2).unwrap();
        assert_eq!(a, vec![0, 2, 10, 12]);
    }

    #[test]
    fn test_pack_rejects_short_destination() {
        let b = source();
        let mut a = vec![0; 11];
        assert!(matches!(
            pack_row_major(&mut a, 3, 4, &b, 4, 1),
            Err(BatchedError::OutOfBounds { .. })
        ));
    }
}
