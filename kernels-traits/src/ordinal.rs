//! Column index types for compressed sparse structures.

/// Integer type usable as a column index (local ordinal) in a CRS structure.
pub trait Ordinal: Copy + Ord + Send + Sync + std::fmt::Debug + 'static {
    /// Widen to `usize` for bounds checks. Negative values map to `None`.
    fn to_usize(self) -> Option<usize>;
}

macro_rules! impl_ordinal_unsigned {
    ($($t:ty),*) => {
        $(impl Ordinal for $t {
            #[inline]
            fn to_usize(self) -> Option<usize> {
                usize::try_from(self).ok()
            }
        })*
    };
}

macro_rules! impl_ordinal_signed {
    ($($t:ty),*) => {
        $(impl Ordinal for $t {
            #[inline]
            fn to_usize(self) -> Option<usize> {
                if self < 0 {
                    None
                } else {
                    usize::try_from(self).ok()
                }
            }
        })*
    };
}

impl_ordinal_unsigned!(u16, u32, u64, usize);
impl_ordinal_signed!(i16, i32, i64, isize);
