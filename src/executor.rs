//! The injectable execution backend: "spawn N independent tasks and join"
//! is the entire capability an executor needs to provide. [`RayonExecutor`]
//! is the default (work-stealing across the global thread pool, mirroring
//! the teacher's `par_chunks`/`reduce` parallel search); [`InlineExecutor`]
//! runs every task on the caller's thread and exists for small batches and
//! differential comparison against the parallel path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

/// Capability an executor must provide: run `task(i)` for every `i` in
/// `0..len`, observing `abort` between tasks (never mid-task), and block
/// until every task has completed or the executor gave up early.
pub trait Executor: Send + Sync {
    fn run_indexed(&self, len: usize, abort: &AtomicBool, task: &(dyn Fn(usize) + Sync));
}

/// Default backend: distributes pairs across rayon's global thread pool.
/// Work-stealing means pairs of wildly different cost (a 4-byte pair next
/// to a 4KB pair) don't starve idle workers, per the pair-granularity
/// scheduling the design calls for.
#[derive(Debug, Default, Clone, Copy)]
pub struct RayonExecutor;

impl Executor for RayonExecutor {
    fn run_indexed(&self, len: usize, abort: &AtomicBool, task: &(dyn Fn(usize) + Sync)) {
        (0..len).into_par_iter().for_each(|i| {
            if abort.load(Ordering::Relaxed) {
                return;
            }
            task(i);
        });
    }
}

/// Serial, in-order backend. Used for small batches where thread dispatch
/// overhead would dominate, and as the second leg of the tier-equivalence
/// differential check (bit-identical to the parallel path by construction,
/// since each pair's result depends only on its own inputs).
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn run_indexed(&self, len: usize, abort: &AtomicBool, task: &(dyn Fn(usize) + Sync)) {
        for i in 0..len {
            if abort.load(Ordering::Relaxed) {
                break;
            }
            task(i);
        }
    }
}

/// Wraps a raw pointer so it can be captured by a `Sync` task closure.
/// Callers must guarantee every task writes a disjoint index so concurrent
/// writes through the pointer never alias.
#[derive(Clone, Copy)]
pub(crate) struct SyncPtr<T>(*mut T);

impl<T> SyncPtr<T> {
    pub(crate) fn new(ptr: *mut T) -> Self {
        Self(ptr)
    }

    /// Method indirection forces closures to capture the whole wrapper
    /// (and its `Sync` impl) rather than disjointly capturing the bare
    /// `*mut T` field, which edition-2021 closure capture would otherwise do.
    pub(crate) fn get(&self) -> *mut T {
        self.0
    }
}

// SAFETY: soundness depends on callers never aliasing writes; see call sites.
unsafe impl<T> Sync for SyncPtr<T> {}
unsafe impl<T> Send for SyncPtr<T> {}

/// Cooperative cancellation flag, polled by the executor between (never
/// during) pair evaluations.
pub type AbortFlag = Arc<AtomicBool>;

pub fn new_abort_flag() -> AbortFlag {
    Arc::new(AtomicBool::new(false))
}

/// Injected allocator for per-worker scratch. The only real implementation
/// today is [`SystemAllocator`]; the trait exists so scratch growth can be
/// redirected (a pool allocator, an arena) without touching the executor or
/// kernel layers.
pub trait ScratchAllocator: Send + Sync {
    fn allocate_scratch(&self) -> crate::kernel::Scratch;
}

/// Hands out a fresh, empty [`crate::kernel::Scratch`] per worker; growth
/// happens lazily via `try_reserve` the first time a pair needs more room.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl ScratchAllocator for SystemAllocator {
    fn allocate_scratch(&self) -> crate::kernel::Scratch {
        crate::kernel::Scratch::new()
    }
}
