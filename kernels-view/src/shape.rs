//! Extents, strides and base offset shared by every view type.

use kernels_traits::ContiguousLayout;

use crate::{Result, ViewError};

/// Where the elements of a view live inside its buffer.
///
/// A `Shape` is only built by checking it against a buffer length, so every
/// in-range multi-index maps to a position inside that buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    dims: Box<[usize]>,
    strides: Box<[isize]>,
    offset: usize,
}

impl Shape {
    /// Arbitrary strides and base offset, checked against a buffer of `len`
    /// elements.
    pub(crate) fn strided(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        if dims.len() != strides.len() {
            return Err(ViewError::StrideCount {
                dims: dims.len(),
                strides: strides.len(),
            });
        }
        let out_of_bounds = || ViewError::OutOfBounds { len };
        let base = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        if dims.contains(&0) {
            return Ok(Self::from_parts(dims, strides, base));
        }
        // lowest and highest element reached, relative to the base
        let (mut lo, mut hi) = (0isize, 0isize);
        for (&d, &s) in dims.iter().zip(strides) {
            let reach = isize::try_from(d - 1)
                .ok()
                .and_then(|steps| steps.checked_mul(s))
                .ok_or_else(out_of_bounds)?;
            if reach < 0 {
                lo = lo.checked_add(reach).ok_or_else(out_of_bounds)?;
            } else {
                hi = hi.checked_add(reach).ok_or_else(out_of_bounds)?;
            }
        }
        let first = offset.checked_add(lo).ok_or_else(out_of_bounds)?;
        let last = offset.checked_add(hi).ok_or_else(out_of_bounds)?;
        if first < 0 || last as usize >= len {
            return Err(out_of_bounds());
        }
        Ok(Self::from_parts(dims, strides, base))
    }

    /// Dense strides in layout `L` covering exactly `len` elements.
    pub(crate) fn contiguous<L: ContiguousLayout>(len: usize, dims: &[usize]) -> Result<Self> {
        let expected: usize = dims.iter().product();
        if expected != len {
            return Err(ViewError::LengthMismatch { expected, got: len });
        }
        Ok(Self::packed::<L>(dims))
    }

    /// Dense strides in layout `L`, for a buffer the caller sizes to match.
    pub(crate) fn packed<L: ContiguousLayout>(dims: &[usize]) -> Self {
        Self::from_parts(dims, &L::strides_for(dims), 0)
    }

    fn from_parts(dims: &[usize], strides: &[isize], offset: usize) -> Self {
        Self {
            dims: dims.into(),
            strides: strides.into(),
            offset,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Buffer position of the element at multi-index zero.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements addressed.
    #[inline]
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// Buffer position of `index`.
    ///
    /// # Panics
    /// Panics if `index` has the wrong length or is out of range.
    pub fn position(&self, index: &[usize]) -> usize {
        assert_eq!(index.len(), self.rank(), "expected {} indices", self.rank());
        let mut pos = self.offset as isize;
        for ((&i, &d), &s) in index.iter().zip(&*self.dims).zip(&*self.strides) {
            assert!(i < d, "index {i} out of range for extent {d}");
            pos += i as isize * s;
        }
        pos as usize
    }

    /// Fails unless every in-range multi-index has its own buffer position.
    ///
    /// Axes of extent above one are taken in order of increasing `|stride|`;
    /// each stride must step past everything the smaller axes reach. This
    /// accepts every dense or sliced layout and rejects zero strides. A few
    /// interleavings that happen to be disjoint are rejected as well.
    pub(crate) fn check_unaliased(&self) -> Result<()> {
        if self.size() <= 1 {
            return Ok(());
        }
        let mut axes: Vec<(usize, usize)> = self
            .dims
            .iter()
            .zip(&*self.strides)
            .filter(|(&d, _)| d > 1)
            .map(|(&d, &s)| (d, s.unsigned_abs()))
            .collect();
        axes.sort_unstable_by_key(|&(_, s)| s);
        let mut reach = 0usize;
        for (d, s) in axes {
            if s <= reach {
                return Err(ViewError::Aliased {
                    dims: self.dims.to_vec(),
                    strides: self.strides.to_vec(),
                });
            }
            reach = reach.saturating_add(s.saturating_mul(d - 1));
        }
        Ok(())
    }

    /// Axes reordered by `perm`: axis `k` of the result is axis `perm[k]`.
    pub(crate) fn permuted(&self, perm: &[usize]) -> Result<Self> {
        let rank = self.rank();
        let mut seen = vec![false; rank];
        let valid = perm.len() == rank
            && perm.iter().all(|&p| p < rank && !std::mem::replace(&mut seen[p], true));
        if !valid {
            return Err(ViewError::BadPermutation {
                perm: perm.to_vec(),
                rank,
            });
        }
        Ok(Self {
            dims: perm.iter().map(|&p| self.dims[p]).collect(),
            strides: perm.iter().map(|&p| self.strides[p]).collect(),
            offset: self.offset,
        })
    }
}
