//! Memory space tags.

/// Memory space tag used as one axis of a dispatch signature.
///
/// `Cuda` and `Hip` only appear in backend registrations; this workspace has
/// no device allocator, so [`HostSpace`] is the only type implementing
/// [`MemorySpace`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemKind {
    Host,
    Cuda,
    Hip,
}

impl MemKind {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Type-level memory space.
pub trait MemorySpace: Copy + Default + Send + Sync + std::fmt::Debug + 'static {
    const KIND: MemKind;
    const NAME: &'static str;
}

/// Ordinary host memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostSpace;

impl MemorySpace for HostSpace {
    const KIND: MemKind = MemKind::Host;
    const NAME: &'static str = "HostSpace";
}
