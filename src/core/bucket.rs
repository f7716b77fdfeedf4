//! A single bucket slot: an unordered collection of at most `PROBE_SIZE`
//! keys.
//!
//! Nothing in this module locks anything. A `ProbeSet` is sound to mutate
//! only while the caller holds the stripe covering its index (see
//! [`crate::core::locking`]); that external discipline is what lets the
//! interior `UnsafeCell` stand in for a per-bucket lock the design doesn't
//! have.

use std::cell::UnsafeCell;

use crate::core::constants::PROBE_SIZE;

pub(crate) struct ProbeSet<K> {
    keys: UnsafeCell<Vec<K>>,
}

// SAFETY: `ProbeSet` is only ever touched through `with`/`with_mut` while
// the owning stripe lock is held, which serializes access the same way a
// per-slot `Mutex` would.
unsafe impl<K: Send> Sync for ProbeSet<K> {}

impl<K> ProbeSet<K> {
    pub(crate) fn new() -> Self {
        Self {
            keys: UnsafeCell::new(Vec::new()),
        }
    }

    /// Read-only access to the slot's keys. Caller must hold the stripe
    /// lock for this slot's index.
    #[inline]
    pub(crate) fn with<R>(&self, f: impl FnOnce(&[K]) -> R) -> R {
        // SAFETY: exclusive access is guaranteed by the stripe lock held
        // for the duration of the caller's critical section.
        f(unsafe { &*self.keys.get() })
    }

    /// Mutable access to the slot's keys. Caller must hold the stripe lock
    /// for this slot's index.
    #[inline]
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut Vec<K>) -> R) -> R {
        // SAFETY: see `with`.
        f(unsafe { &mut *self.keys.get() })
    }

    pub(crate) fn len(&self) -> usize {
        self.with(<[K]>::len)
    }
}

impl<K: PartialEq> ProbeSet<K> {
    pub(crate) fn contains(&self, key: &K) -> bool {
        self.with(|keys| keys.contains(key))
    }

    /// Appends `key` without checking capacity; callers must have already
    /// checked `len() < PROBE_SIZE`.
    pub(crate) fn push(&self, key: K) {
        self.with_mut(|keys| {
            debug_assert!(keys.len() < PROBE_SIZE);
            keys.push(key);
        });
    }

    /// Removes the first key equal to `key`, returning whether it was present.
    pub(crate) fn remove(&self, key: &K) -> bool {
        self.with_mut(|keys| {
            if let Some(pos) = keys.iter().position(|k| k == key) {
                keys.swap_remove(pos);
                true
            } else {
                false
            }
        })
    }

    /// Non-destructive peek at the first key, if any — used by relocation
    /// to pick a victim before acquiring its stripes.
    pub(crate) fn peek_first(&self) -> Option<K>
    where
        K: Clone,
    {
        self.with(|keys| keys.first().cloned())
    }
}

impl<K> Default for ProbeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
