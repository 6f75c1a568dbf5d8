//! Memory layout tags.
//!
//! Layouts are zero-sized marker types: `LayoutLeft` is column-major (first
//! index varies fastest), `LayoutRight` is row-major (last index varies
//! fastest), and `LayoutStride` carries arbitrary per-dimension strides.

/// Layout tag used as one axis of a dispatch signature.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Left,
    Right,
    Stride,
}

impl LayoutKind {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Type-level memory layout.
pub trait Layout: Copy + Default + Send + Sync + std::fmt::Debug + 'static {
    const KIND: LayoutKind;
}

/// A layout whose strides are fully determined by the dimensions.
pub trait ContiguousLayout: Layout {
    fn strides_for(dims: &[usize]) -> Vec<isize>;
}

/// Column-major layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutLeft;

/// Row-major layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutRight;

/// Arbitrary strides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStride;

impl Layout for LayoutLeft {
    const KIND: LayoutKind = LayoutKind::Left;
}

impl Layout for LayoutRight {
    const KIND: LayoutKind = LayoutKind::Right;
}

impl Layout for LayoutStride {
    const KIND: LayoutKind = LayoutKind::Stride;
}

impl ContiguousLayout for LayoutLeft {
    fn strides_for(dims: &[usize]) -> Vec<isize> {
        col_major_strides(dims)
    }
}

impl ContiguousLayout for LayoutRight {
    fn strides_for(dims: &[usize]) -> Vec<isize> {
        row_major_strides(dims)
    }
}

fn running_products<'a>(dims: impl Iterator<Item = &'a usize>) -> Vec<isize> {
    let mut acc = 1isize;
    dims.map(|&d| {
        let s = acc;
        acc *= d as isize;
        s
    })
    .collect()
}

/// Column-major strides: `strides[k]` is the product of `dims[..k]`.
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    running_products(dims.iter())
}

/// Row-major strides: `strides[k]` is the product of `dims[k + 1..]`.
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let mut strides = running_products(dims.iter().rev());
    strides.reverse();
    strides
}
