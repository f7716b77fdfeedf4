//! The two stripe-lock arrays `L[0]`/`L[1]` and the acquire/release
//! discipline that keeps per-key mutation and whole-table resize from
//! ever deadlocking.
//!
//! Every per-key critical section locks `L[0][·]` before `L[1][·]` and
//! releases in the opposite order. A resize locks every stripe in `L[0]`,
//! in ascending order, before touching either bucket array — since any
//! mutator must already hold one of those stripes to make progress, the
//! resize simply waits the mutator out instead of racing it.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// The two fixed-length lock arrays. `stripe_count` never changes after
/// construction, even though the bucket arrays it guards double in size
/// on every resize.
pub(crate) struct StripeLocks {
    l0: Vec<ReentrantMutex<()>>,
    l1: Vec<ReentrantMutex<()>>,
}

impl StripeLocks {
    pub(crate) fn new(stripe_count: usize) -> Self {
        Self {
            l0: (0..stripe_count).map(|_| ReentrantMutex::new(())).collect(),
            l1: (0..stripe_count).map(|_| ReentrantMutex::new(())).collect(),
        }
    }

    pub(crate) fn stripe_count(&self) -> usize {
        self.l0.len()
    }

    /// Acquire both stripes covering a key, given its two precomputed
    /// stripe indices. `L[0]` is always locked first.
    pub(crate) fn acquire(&self, stripe0: usize, stripe1: usize) -> KeyGuard<'_> {
        let l0 = self.l0[stripe0].lock();
        let l1 = self.l1[stripe1].lock();
        KeyGuard { l1, l0 }
    }

    /// Lock the world: every `L[0]` stripe, ascending. Used only by resize.
    pub(crate) fn acquire_world(&self) -> WorldGuard<'_> {
        let mut guards = Vec::with_capacity(self.l0.len());
        for lock in &self.l0 {
            guards.push(lock.lock());
        }
        WorldGuard { guards }
    }
}

/// Holds both stripes for one key. Field order matters: Rust drops struct
/// fields top to bottom, and release must unlock `L[1]` before `L[0]`.
pub(crate) struct KeyGuard<'a> {
    l1: ReentrantMutexGuard<'a, ()>,
    l0: ReentrantMutexGuard<'a, ()>,
}

/// Holds every `L[0]` stripe during a resize.
pub(crate) struct WorldGuard<'a> {
    guards: Vec<ReentrantMutexGuard<'a, ()>>,
}

impl Drop for WorldGuard<'_> {
    fn drop(&mut self) {
        // Release highest index first, i.e. the reverse of acquisition order.
        while self.guards.pop().is_some() {}
    }
}
