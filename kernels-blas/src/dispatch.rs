//! Backend availability tables.
//!
//! Each operation owns a [`Registry`]: one [`Partition`] per vendor backend,
//! listing the signatures that backend implements. A lookup walks the
//! partitions whose backend is enabled in a [`BuildConfig`] and returns the
//! first match. Lookups are `const fn`, so [`Signature`] can expose the answer
//! for the active build as an associated constant and the forwarding branch
//! in each operation folds away.
//!
//! A signature that appears in two partitions of the same registry is
//! rejected at compile time.

use std::marker::PhantomData;

use kernels_exec::{ExecKind, ExecutionSpace};
use kernels_traits::{Layout, LayoutKind, MemKind, MemorySpace, Scalar, ScalarKind};

use crate::backend::{BackendId, BuildConfig};

/// Operations that go through the dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Rot,
    Rotm,
}

/// Value-level form of a dispatch signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    pub exec: ExecKind,
    pub scalar: ScalarKind,
    pub layout: LayoutKind,
    pub memory: MemKind,
}

impl SignatureKey {
    pub const fn new(exec: ExecKind, scalar: ScalarKind, layout: LayoutKind, memory: MemKind) -> Self {
        Self {
            exec,
            scalar,
            layout,
            memory,
        }
    }

    /// Key for a combination of types.
    pub const fn of<E, S, L, M>() -> Self
    where
        E: ExecutionSpace,
        S: Scalar,
        L: Layout,
        M: MemorySpace,
    {
        Self::new(E::KIND, S::KIND, L::KIND, M::KIND)
    }

    /// `==` usable in `const` context.
    pub const fn same_as(&self, other: &SignatureKey) -> bool {
        self.exec.code() == other.exec.code()
            && self.scalar.code() == other.scalar.code()
            && self.layout.code() == other.layout.code()
            && self.memory.code() == other.memory.code()
    }
}

/// Signatures implemented by one backend for one operation.
#[derive(Debug, Clone, Copy)]
pub struct Partition {
    pub backend: BackendId,
    pub entries: &'static [SignatureKey],
}

/// All backend partitions of one operation.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    pub op: Operation,
    pub partitions: &'static [Partition],
}

impl Registry {
    /// The backend that implements `key` under `config`, if any.
    pub const fn lookup(&self, config: BuildConfig, key: SignatureKey) -> Option<BackendId> {
        let mut p = 0;
        while p < self.partitions.len() {
            let part = &self.partitions[p];
            if config.enabled(part.backend) {
                let mut e = 0;
                while e < part.entries.len() {
                    if part.entries[e].same_as(&key) {
                        return Some(part.backend);
                    }
                    e += 1;
                }
            }
            p += 1;
        }
        None
    }

    /// Whether any signature is registered more than once across partitions.
    pub const fn has_overlap(&self) -> bool {
        let mut p = 0;
        while p < self.partitions.len() {
            let a = self.partitions[p].entries;
            let mut i = 0;
            while i < a.len() {
                // later entries of the same partition, then every later partition
                let mut q = p;
                while q < self.partitions.len() {
                    let b = self.partitions[q].entries;
                    let mut j = if q == p { i + 1 } else { 0 };
                    while j < b.len() {
                        if a[i].same_as(&b[j]) {
                            return true;
                        }
                        j += 1;
                    }
                    q += 1;
                }
                i += 1;
            }
            p += 1;
        }
        false
    }
}

/// Cartesian product of the given axes with a single memory space.
const fn product<const N: usize>(
    execs: &[ExecKind],
    scalars: &[ScalarKind],
    layouts: &[LayoutKind],
    memory: MemKind,
) -> [SignatureKey; N] {
    assert!(execs.len() * scalars.len() * layouts.len() == N);
    let mut out = [SignatureKey::new(ExecKind::Serial, ScalarKind::Other, LayoutKind::Stride, memory); N];
    let mut k = 0;
    let mut e = 0;
    while e < execs.len() {
        let mut s = 0;
        while s < scalars.len() {
            let mut l = 0;
            while l < layouts.len() {
                out[k] = SignatureKey::new(execs[e], scalars[s], layouts[l], memory);
                k += 1;
                l += 1;
            }
            s += 1;
        }
        e += 1;
    }
    out
}

const REAL_FLOATS: [ScalarKind; 2] = [ScalarKind::F64, ScalarKind::F32];
const DENSE_LAYOUTS: [LayoutKind; 2] = [LayoutKind::Left, LayoutKind::Right];

const HOST_ENTRIES: [SignatureKey; 8] = product(
    &[ExecKind::Serial, ExecKind::Threads],
    &REAL_FLOATS,
    &DENSE_LAYOUTS,
    MemKind::Host,
);
const CUDA_ENTRIES: [SignatureKey; 4] =
    product(&[ExecKind::Cuda], &REAL_FLOATS, &DENSE_LAYOUTS, MemKind::Cuda);
const HIP_ENTRIES: [SignatureKey; 4] =
    product(&[ExecKind::Hip], &REAL_FLOATS, &DENSE_LAYOUTS, MemKind::Hip);

const ROTATION_PARTITIONS: [Partition; 3] = [
    Partition {
        backend: BackendId::HostBlas,
        entries: &HOST_ENTRIES,
    },
    Partition {
        backend: BackendId::CuBlas,
        entries: &CUDA_ENTRIES,
    },
    Partition {
        backend: BackendId::RocBlas,
        entries: &HIP_ENTRIES,
    },
];

/// Backends for the modified Givens rotation.
pub const ROTM_REGISTRY: Registry = Registry {
    op: Operation::Rotm,
    partitions: &ROTATION_PARTITIONS,
};

/// Backends for the plain Givens rotation.
pub const ROT_REGISTRY: Registry = Registry {
    op: Operation::Rot,
    partitions: &ROTATION_PARTITIONS,
};

const _: () = assert!(!ROTM_REGISTRY.has_overlap(), "ambiguous rotm backend registration");
const _: () = assert!(!ROT_REGISTRY.has_overlap(), "ambiguous rot backend registration");

/// Registry for `op`.
pub const fn registry(op: Operation) -> &'static Registry {
    match op {
        Operation::Rot => &ROT_REGISTRY,
        Operation::Rotm => &ROTM_REGISTRY,
    }
}

/// Type-level dispatch signature: execution space, scalar, layout and memory
/// space. Every combination is defined; anything not registered resolves to
/// `None` / `false`.
#[derive(Debug)]
pub struct Signature<E, S, L, M>(PhantomData<(E, S, L, M)>);

impl<E, S, L, M> Signature<E, S, L, M>
where
    E: ExecutionSpace,
    S: Scalar,
    L: Layout,
    M: MemorySpace,
{
    pub const KEY: SignatureKey = SignatureKey::of::<E, S, L, M>();

    pub const ROTM_BACKEND: Option<BackendId> = ROTM_REGISTRY.lookup(BuildConfig::ACTIVE, Self::KEY);
    pub const ROTM_AVAILABLE: bool = Self::ROTM_BACKEND.is_some();

    pub const ROT_BACKEND: Option<BackendId> = ROT_REGISTRY.lookup(BuildConfig::ACTIVE, Self::KEY);
    pub const ROT_AVAILABLE: bool = Self::ROT_BACKEND.is_some();
}

/// Whether a vendor `rotm` exists for this combination in the active build.
pub const fn is_rotm_available<E, S, L, M>() -> bool
where
    E: ExecutionSpace,
    S: Scalar,
    L: Layout,
    M: MemorySpace,
{
    Signature::<E, S, L, M>::ROTM_AVAILABLE
}

/// Whether a vendor `rot` exists for this combination in the active build.
pub const fn is_rot_available<E, S, L, M>() -> bool
where
    E: ExecutionSpace,
    S: Scalar,
    L: Layout,
    M: MemorySpace,
{
    Signature::<E, S, L, M>::ROT_AVAILABLE
}
