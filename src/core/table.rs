//! The two parallel bucket arrays `T[0]`/`T[1]` and the bookkeeping
//! (`capacity`, `relocation_limit`) that resize mutates.
//!
//! Each array lives behind a `RwLock` whose write side is taken only by
//! resize, to swap in a freshly allocated `Vec` of empty probe sets; every
//! steady-state operation takes only the (cheap, shared) read side to
//! reach the slot it actually needs, relying on the stripe locks in
//! [`crate::core::locking`] to serialize same-key mutation of that slot.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::bucket::ProbeSet;

pub(crate) struct Tables<K> {
    t0: RwLock<Vec<ProbeSet<K>>>,
    t1: RwLock<Vec<ProbeSet<K>>>,
    capacity: AtomicUsize,
    relocation_limit: AtomicUsize,
}

impl<K> Tables<K> {
    pub(crate) fn new(initial_capacity: usize) -> Self {
        Self {
            t0: RwLock::new(Self::fresh_array(initial_capacity)),
            t1: RwLock::new(Self::fresh_array(initial_capacity)),
            capacity: AtomicUsize::new(initial_capacity),
            relocation_limit: AtomicUsize::new((initial_capacity / 2).max(1)),
        }
    }

    fn fresh_array(capacity: usize) -> Vec<ProbeSet<K>> {
        (0..capacity).map(|_| ProbeSet::new()).collect()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn relocation_limit(&self) -> usize {
        self.relocation_limit.load(Ordering::Acquire)
    }

    /// Run `f` against bucket `idx` of table `which` (0 or 1).
    pub(crate) fn with_bucket<R>(&self, which: usize, idx: usize, f: impl FnOnce(&ProbeSet<K>) -> R) -> R {
        let array = if which == 0 { self.t0.read() } else { self.t1.read() };
        f(&array[idx])
    }

    /// Sum of both tables' occupancy. Not linearizable: it takes the two
    /// read locks one after the other, not atomically together.
    pub(crate) fn size(&self) -> usize {
        let n0: usize = self.t0.read().iter().map(ProbeSet::len).sum();
        let n1: usize = self.t1.read().iter().map(ProbeSet::len).sum();
        n0 + n1
    }

    /// Double capacity and relocation limit, replacing both bucket arrays
    /// with fresh, empty ones. Returns every key that was present,
    /// draining the old arrays as it goes. Caller must already hold every
    /// `L[0]` stripe lock.
    pub(crate) fn swap_doubled(&self) -> Vec<K> {
        let new_capacity = self.capacity() * 2;
        let mut w0 = self.t0.write();
        let mut w1 = self.t1.write();

        let mut drained = Vec::new();
        for slot in w0.iter() {
            slot.with_mut(|keys| drained.append(keys));
        }
        for slot in w1.iter() {
            slot.with_mut(|keys| drained.append(keys));
        }

        *w0 = Self::fresh_array(new_capacity);
        *w1 = Self::fresh_array(new_capacity);
        drop(w0);
        drop(w1);

        self.capacity.store(new_capacity, Ordering::Release);
        self.relocation_limit.fetch_mul_saturating(2);

        drained
    }
}

trait FetchMulSaturating {
    fn fetch_mul_saturating(&self, factor: usize);
}

impl FetchMulSaturating for AtomicUsize {
    fn fetch_mul_saturating(&self, factor: usize) {
        let mut current = self.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_mul(factor);
            match self.compare_exchange_weak(current, next, Ordering::Release, Ordering::Relaxed) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_table_is_empty() {
        let tables: Tables<u64> = Tables::new(8);
        assert_eq!(tables.size(), 0);
        assert_eq!(tables.capacity(), 8);
        assert_eq!(tables.relocation_limit(), 4);
    }

    #[test]
    fn swap_doubled_preserves_keys_and_doubles_bookkeeping() {
        let tables: Tables<u64> = Tables::new(4);
        tables.with_bucket(0, 0, |slot| slot.push(1));
        tables.with_bucket(0, 1, |slot| slot.push(2));
        tables.with_bucket(1, 2, |slot| slot.push(3));

        let mut drained = tables.swap_doubled();
        drained.sort_unstable();
        assert_eq!(drained, vec![1, 2, 3]);
        assert_eq!(tables.capacity(), 8);
        assert_eq!(tables.relocation_limit(), 8);
        assert_eq!(tables.size(), 0);
    }
}
