use std::fmt::Debug;
use std::ops::Range;

use kernels_traits::{HostSpace, MemorySpace};

/// Execution space tag used as one axis of a dispatch signature.
///
/// `Cuda` and `Hip` only appear in backend registrations; no device execution
/// space is implemented in this workspace.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecKind {
    Serial,
    Threads,
    Cuda,
    Hip,
}

impl ExecKind {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Minimum loop length per task before [`ExecutionSpace::parallel_for`]
/// stops splitting.
pub const MIN_PARALLEL_LEN: usize = 1 << 10;

/// Where fork-join work runs.
pub trait ExecutionSpace: Clone + Send + Sync + Debug + 'static {
    /// Memory space this execution space can address.
    type MemorySpace: MemorySpace;

    const KIND: ExecKind;
    const NAME: &'static str;

    /// Number of workers available to this space.
    fn concurrency(&self) -> usize;

    /// Run both closures, possibly in parallel, and return both results.
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;

    /// Run `op` with this space as the ambient pool, so that nested rayon
    /// calls inside `op` use its workers.
    fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send;

    /// Call `body(i)` for every `i` in `range`.
    ///
    /// The range is halved recursively through [`ExecutionSpace::join`]
    /// until a piece is shorter than [`MIN_PARALLEL_LEN`].
    fn parallel_for<F>(&self, range: Range<usize>, body: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        split_range(self, range, self.concurrency(), &body);
    }

    /// Stable sort of `data` by `key`, using this space's workers when it
    /// has any.
    fn sort_by_key<T, K, F>(&self, data: &mut [T], key: F)
    where
        T: Send,
        K: Ord,
        F: Fn(&T) -> K + Sync + Send,
    {
        data.sort_by_key(key);
    }

    /// Unstable sort of `data`, using this space's workers when it has any.
    fn sort_unstable<T: Ord + Send>(&self, data: &mut [T]) {
        data.sort_unstable();
    }
}

fn split_range<E, F>(exec: &E, range: Range<usize>, nthreads: usize, body: &F)
where
    E: ExecutionSpace + ?Sized,
    F: Fn(usize) + Sync,
{
    if nthreads <= 1 || range.len() <= MIN_PARALLEL_LEN {
        range.for_each(body);
        return;
    }
    let mid = range.start + range.len() / 2;
    let nt_left = nthreads / 2;
    let nt_right = nthreads - nt_left;
    exec.join(
        || split_range(exec, range.start..mid, nt_left, body),
        || split_range(exec, mid..range.end, nt_right, body),
    );
}

/// Runs everything on the calling thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serial;

impl ExecutionSpace for Serial {
    type MemorySpace = HostSpace;

    const KIND: ExecKind = ExecKind::Serial;
    const NAME: &'static str = "Serial";

    #[inline]
    fn concurrency(&self) -> usize {
        1
    }

    #[inline]
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let ra = a();
        let rb = b();
        (ra, rb)
    }

    #[inline]
    fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        op()
    }

    fn parallel_for<F>(&self, range: Range<usize>, body: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        range.for_each(body);
    }
}

#[cfg(feature = "parallel")]
mod threads {
    use std::sync::Arc;

    use rayon::slice::ParallelSliceMut;

    use super::*;
    use crate::{ExecError, Result};

    /// Rayon-backed host execution space.
    ///
    /// [`Threads::global`] uses rayon's global pool, which honours
    /// `RAYON_NUM_THREADS`. [`Threads::new`] builds a dedicated pool.
    #[derive(Debug, Clone, Default)]
    pub struct Threads {
        pool: Option<Arc<rayon::ThreadPool>>,
    }

    impl Threads {
        /// Use rayon's global thread pool.
        pub fn global() -> Self {
            Self { pool: None }
        }

        /// Build a dedicated pool with `num_threads` workers.
        pub fn new(num_threads: usize) -> Result<Self> {
            if num_threads == 0 {
                return Err(ExecError::InvalidThreadCount);
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("kernels-worker-{i}"))
                .build()?;
            tracing::debug!(num_threads, "built dedicated thread pool");
            Ok(Self {
                pool: Some(Arc::new(pool)),
            })
        }
    }

    impl ExecutionSpace for Threads {
        type MemorySpace = HostSpace;

        const KIND: ExecKind = ExecKind::Threads;
        const NAME: &'static str = "Threads";

        fn concurrency(&self) -> usize {
            match &self.pool {
                Some(pool) => pool.current_num_threads(),
                None => rayon::current_num_threads(),
            }
        }

        fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
        where
            A: FnOnce() -> RA + Send,
            B: FnOnce() -> RB + Send,
            RA: Send,
            RB: Send,
        {
            self.install(|| rayon::join(a, b))
        }

        fn install<R, OP>(&self, op: OP) -> R
        where
            OP: FnOnce() -> R + Send,
            R: Send,
        {
            match &self.pool {
                Some(pool) => pool.install(op),
                None => op(),
            }
        }

        fn sort_by_key<T, K, F>(&self, data: &mut [T], key: F)
        where
            T: Send,
            K: Ord,
            F: Fn(&T) -> K + Sync + Send,
        {
            self.install(|| data.par_sort_by_key(key));
        }

        fn sort_unstable<T: Ord + Send>(&self, data: &mut [T]) {
            self.install(|| data.par_sort_unstable());
        }
    }
}

#[cfg(feature = "parallel")]
pub use threads::Threads;

/// Execution space used by the convenience entry points.
#[cfg(feature = "parallel")]
pub type DefaultExecutionSpace = Threads;

/// Execution space used by the convenience entry points.
#[cfg(not(feature = "parallel"))]
pub type DefaultExecutionSpace = Serial;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn visit_count<E: ExecutionSpace>(exec: &E, n: usize) -> Vec<usize> {
        let hits: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        exec.parallel_for(0..n, |i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
        });
        hits.into_iter().map(AtomicUsize::into_inner).collect()
    }

    #[test]
    fn test_serial_parallel_for_visits_each_index_once() {
        assert!(visit_count(&Serial, 100).iter().all(|&c| c == 1));
        assert!(visit_count(&Serial, 0).is_empty());
    }

    #[test]
    fn test_serial_join_runs_both() {
        let (a, b) = Serial.join(|| 1, || 2);
        assert_eq!((a, b), (1, 2));
        assert_eq!(Serial.concurrency(), 1);
    }

    #[test]
    fn test_kind_codes_distinct() {
        let codes = [
            ExecKind::Serial.code(),
            ExecKind::Threads.code(),
            ExecKind::Cuda.code(),
            ExecKind::Hip.code(),
        ];
        for i in 0..codes.len() {
            for j in i + 1..codes.len() {
                assert_ne!(codes[i], codes[j]);
            }
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_threads_parallel_for_visits_each_index_once() {
        let exec = Threads::new(4).unwrap();
        assert_eq!(exec.concurrency(), 4);
        let n = 10 * MIN_PARALLEL_LEN + 3;
        assert!(visit_count(&exec, n).iter().all(|&c| c == 1));
    }

    #[test]
    fn test_serial_sort_by_key_is_stable() {
        let mut pairs = vec![(3, 'a'), (1, 'b'), (3, 'c'), (1, 'd')];
        Serial.sort_by_key(&mut pairs, |p| p.0);
        assert_eq!(pairs, vec![(1, 'b'), (1, 'd'), (3, 'a'), (3, 'c')]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_threads_sorts_match_serial() {
        let exec = Threads::new(4).unwrap();
        let data: Vec<u32> = (0..20_000u32).map(|i| i.wrapping_mul(2_654_435_761) % 997).collect();

        let mut a = data.clone();
        let mut b = data.clone();
        Serial.sort_unstable(&mut a);
        exec.sort_unstable(&mut b);
        assert_eq!(a, b);

        let mut pa: Vec<(u32, usize)> = data.iter().copied().zip(0..).collect();
        let mut pb = pa.clone();
        Serial.sort_by_key(&mut pa, |p| p.0);
        exec.sort_by_key(&mut pb, |p| p.0);
        assert_eq!(pa, pb);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_threads_rejects_zero_threads() {
        assert!(matches!(
            Threads::new(0),
            Err(crate::ExecError::InvalidThreadCount)
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_threads_install_uses_own_pool() {
        let exec = Threads::new(3).unwrap();
        let n = exec.install(rayon::current_num_threads);
        assert_eq!(n, 3);
    }
}
