//! The concurrent cuckoo hash set: placement, relocation, and resize.

use std::hash::Hash;

use crate::config::CuckooSetConfig;
use crate::core::constants::{PROBE_SIZE, THRESHOLD};
use crate::core::hasher::TwoWayHasher;
use crate::core::locking::StripeLocks;
use crate::core::table::Tables;
use crate::error::Result;
use crate::stats::{SetStats, StatsCounters};

/// What [`CuckooSet::try_add`] found out while holding the key's stripes.
enum AddOutcome<K> {
    Inserted,
    AlreadyPresent,
    /// The key was placed but its bucket is now over `THRESHOLD`; the
    /// caller must run relocation starting from `(table, idx)`.
    NeedsRelocation(usize, usize),
    /// Both candidate buckets were already at `PROBE_SIZE`; the key was
    /// not placed and is handed back so the caller can resize and retry.
    NeedsResize(K),
}

/// A concurrent set of unique keys backed by two cuckoo hash tables.
///
/// `contains`, `add`, and `remove` each lock only the two stripes covering
/// their key, so independent keys make progress independently. A bucket
/// that grows past `THRESHOLD` triggers a relocation chain that evicts a
/// resident to its alternate table; a chain that cannot find room
/// anywhere triggers a resize that doubles both bucket arrays.
///
/// See the crate-level docs for the full locking and resize discipline.
pub struct CuckooSet<K> {
    tables: Tables<K>,
    locks: StripeLocks,
    hasher: TwoWayHasher,
    stats: StatsCounters,
}

impl<K: Hash + Eq + Clone + Send> CuckooSet<K> {
    /// Create a set with `initial_capacity` buckets per table and the same
    /// number of lock stripes. `initial_capacity` must be positive.
    pub fn new(initial_capacity: usize) -> Result<Self> {
        Self::with_config(CuckooSetConfig::new(initial_capacity))
    }

    /// Create a set from an explicit [`CuckooSetConfig`], e.g. to pin the
    /// stripe count independently of the initial capacity.
    pub fn with_config(config: CuckooSetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tables: Tables::new(config.initial_capacity),
            locks: StripeLocks::new(config.stripe_count),
            hasher: TwoWayHasher::new(),
            stats: StatsCounters::default(),
        })
    }

    /// Returns `true` if `key` is currently present.
    pub fn contains(&self, key: &K) -> bool {
        let guard = self.locks.acquire(self.stripe0(key), self.stripe1(key));
        let found = self.present(key);
        drop(guard);
        found
    }

    /// Inserts `key`. Returns `true` if it was newly inserted, `false` if
    /// it was already present.
    pub fn add(&self, key: K) -> bool {
        match self.try_add(key) {
            AddOutcome::Inserted => true,
            AddOutcome::AlreadyPresent => false,
            AddOutcome::NeedsRelocation(table, idx) => {
                self.stats.record_relocation_attempt();
                if !self.relocate(table, idx) {
                    self.resize();
                }
                true
            }
            AddOutcome::NeedsResize(key) => {
                self.resize();
                self.add(key)
            }
        }
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&self, key: &K) -> bool {
        let guard = self.locks.acquire(self.stripe0(key), self.stripe1(key));
        let capacity = self.tables.capacity();

        let h0 = self.hasher.h0(key, capacity);
        if self.tables.with_bucket(0, h0, |bucket| bucket.remove(key)) {
            drop(guard);
            return true;
        }

        let h1 = self.hasher.h1(key, capacity);
        let removed = self.tables.with_bucket(1, h1, |bucket| bucket.remove(key));
        drop(guard);
        removed
    }

    /// Total number of keys across both tables. Best-effort under
    /// concurrent mutation; exact at quiescence.
    pub fn size(&self) -> usize {
        self.tables.size()
    }

    /// Inserts every key in `keys`. Returns `false` on the first duplicate,
    /// leaving everything inserted so far in the set.
    pub fn populate<I: IntoIterator<Item = K>>(&self, keys: I) -> bool {
        for key in keys {
            if !self.add(key) {
                return false;
            }
        }
        true
    }

    /// A snapshot of diagnostic counters (resizes, relocation activity).
    pub fn stats(&self) -> SetStats {
        self.stats.snapshot()
    }

    #[inline]
    fn stripe0(&self, key: &K) -> usize {
        self.hasher.stripe0(key, self.locks.stripe_count())
    }

    #[inline]
    fn stripe1(&self, key: &K) -> usize {
        self.hasher.stripe1(key, self.locks.stripe_count())
    }

    /// Checks both candidate buckets for `key` at the current capacity.
    /// Caller must hold both stripes for `key`.
    fn present(&self, key: &K) -> bool {
        let capacity = self.tables.capacity();
        let h0 = self.hasher.h0(key, capacity);
        if self.tables.with_bucket(0, h0, |bucket| bucket.contains(key)) {
            return true;
        }
        let h1 = self.hasher.h1(key, capacity);
        self.tables.with_bucket(1, h1, |bucket| bucket.contains(key))
    }

    fn try_add(&self, key: K) -> AddOutcome<K> {
        let guard = self.locks.acquire(self.stripe0(&key), self.stripe1(&key));
        let capacity = self.tables.capacity();
        let h0 = self.hasher.h0(&key, capacity);
        let h1 = self.hasher.h1(&key, capacity);

        if self.tables.with_bucket(0, h0, |bucket| bucket.contains(&key))
            || self.tables.with_bucket(1, h1, |bucket| bucket.contains(&key))
        {
            drop(guard);
            return AddOutcome::AlreadyPresent;
        }

        let len0 = self.tables.with_bucket(0, h0, |bucket| bucket.len());
        if len0 < THRESHOLD {
            self.tables.with_bucket(0, h0, |bucket| bucket.push(key));
            drop(guard);
            return AddOutcome::Inserted;
        }

        let len1 = self.tables.with_bucket(1, h1, |bucket| bucket.len());
        if len1 < THRESHOLD {
            self.tables.with_bucket(1, h1, |bucket| bucket.push(key));
            drop(guard);
            return AddOutcome::Inserted;
        }

        if len0 < PROBE_SIZE {
            self.tables.with_bucket(0, h0, |bucket| bucket.push(key));
            drop(guard);
            return AddOutcome::NeedsRelocation(0, h0);
        }

        if len1 < PROBE_SIZE {
            self.tables.with_bucket(1, h1, |bucket| bucket.push(key));
            drop(guard);
            return AddOutcome::NeedsRelocation(1, h1);
        }

        drop(guard);
        AddOutcome::NeedsResize(key)
    }

    /// Evicts residents out of an over-`THRESHOLD` bucket until it drops
    /// back under threshold, or gives up after `relocation_limit` rounds.
    /// Holds no locks between iterations; re-peeks and re-acquires each
    /// time, per the compare-after-lock pattern required for soundness.
    fn relocate(&self, mut table: usize, mut idx: usize) -> bool {
        let limit = self.tables.relocation_limit();
        for round in 1..=limit {
            let j = 1 - table;
            let victim = match self.tables.with_bucket(table, idx, |bucket| bucket.peek_first()) {
                Some(victim) => victim,
                None => {
                    self.stats.record_relocation_success(round);
                    return true;
                }
            };

            let new_idx = {
                let capacity = self.tables.capacity();
                if j == 0 {
                    self.hasher.h0(&victim, capacity)
                } else {
                    self.hasher.h1(&victim, capacity)
                }
            };

            let guard = self
                .locks
                .acquire(self.stripe0(&victim), self.stripe1(&victim));

            if self.tables.with_bucket(table, idx, |bucket| bucket.contains(&victim)) {
                self.tables.with_bucket(table, idx, |bucket| {
                    bucket.remove(&victim);
                });

                let dest_len = self.tables.with_bucket(j, new_idx, |bucket| bucket.len());
                if dest_len < THRESHOLD {
                    self.tables.with_bucket(j, new_idx, |bucket| bucket.push(victim));
                    drop(guard);
                    self.stats.record_relocation_success(round);
                    return true;
                } else if dest_len < PROBE_SIZE {
                    self.tables.with_bucket(j, new_idx, |bucket| bucket.push(victim));
                    drop(guard);
                    table = j;
                    idx = new_idx;
                    continue;
                } else {
                    self.tables.with_bucket(table, idx, |bucket| bucket.push(victim));
                    drop(guard);
                    return false;
                }
            } else if self.tables.with_bucket(table, idx, |bucket| bucket.len()) >= THRESHOLD {
                drop(guard);
                continue;
            } else {
                drop(guard);
                self.stats.record_relocation_success(round);
                return true;
            }
        }
        false
    }

    /// Locks the world (every `L[0]` stripe), doubles both bucket arrays,
    /// and reinserts every key that was present. Reentrant: nested `add`
    /// calls re-lock stripes this thread already holds in `L[0]`.
    fn resize(&self) {
        let world = self.locks.acquire_world();
        let drained = self.tables.swap_doubled();
        self.stats.record_resize();
        log::info!(
            "cuckoo set resize: capacity now {}, rehashing {} keys",
            self.tables.capacity(),
            drained.len()
        );
        for key in drained {
            self.add(key);
        }
        drop(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CuckooError;

    #[test]
    fn rejects_zero_capacity() {
        assert!(CuckooSet::<u64>::new(0).is_err());
    }

    #[test]
    fn scenario_s1_basic_single_thread() {
        let set = CuckooSet::new(16).unwrap();
        assert!(set.populate([1u64, 2, 3, 4, 5]));
        assert!(set.contains(&3));
        assert!(!set.contains(&99));
        assert!(set.remove(&3));
        assert!(!set.contains(&3));
        assert_eq!(set.size(), 4);
    }

    #[test]
    fn scenario_s2_duplicates() {
        let set = CuckooSet::new(16).unwrap();
        set.populate([1u64, 2, 3, 4, 5]);
        set.remove(&3);

        assert!(!set.add(4));
        assert!(!set.populate([7u64, 7]));
        assert_eq!(set.size(), 5);
    }

    #[test]
    fn scenario_s3_resize_under_growth() {
        let set = CuckooSet::new(2).unwrap();
        for k in 0u64..20 {
            assert!(set.add(k));
        }
        assert_eq!(set.size(), 20);
        for k in 0u64..20 {
            assert!(set.contains(&k));
        }
        assert!(set.tables.capacity() >= 16);
        assert!(set.stats().resizes >= 3);
    }

    #[test]
    fn add_add_is_idempotent() {
        let set = CuckooSet::new(8).unwrap();
        assert!(set.add(1u64));
        assert!(!set.add(1u64));
    }

    #[test]
    fn remove_remove_reports_absence_second_time() {
        let set = CuckooSet::new(8).unwrap();
        set.add(1u64);
        assert!(set.remove(&1));
        assert!(!set.remove(&1));
    }

    #[test]
    fn every_present_key_sits_in_one_of_its_two_buckets() {
        let set = CuckooSet::new(4).unwrap();
        for k in 0u64..64 {
            set.add(k);
        }
        let capacity = set.tables.capacity();
        for k in 0u64..64 {
            if !set.contains(&k) {
                continue;
            }
            let h0 = set.hasher.h0(&k, capacity);
            let h1 = set.hasher.h1(&k, capacity);
            let in_t0 = set.tables.with_bucket(0, h0, |b| b.contains(&k));
            let in_t1 = set.tables.with_bucket(1, h1, |b| b.contains(&k));
            assert!(in_t0 || in_t1);
        }
    }

    #[test]
    fn no_slot_ever_exceeds_probe_size() {
        let set = CuckooSet::new(4).unwrap();
        for k in 0u64..200 {
            set.add(k);
        }
        let capacity = set.tables.capacity();
        for table in 0..2 {
            for idx in 0..capacity {
                let len = set.tables.with_bucket(table, idx, |b| b.len());
                assert!(len <= PROBE_SIZE);
            }
        }
    }

    #[test]
    fn stripe_count_can_be_pinned_independently_of_capacity() {
        // 8 evenly divides 64, so every pair of bucket indices that collide
        // mod capacity keeps colliding mod stripe_count as capacity doubles.
        let set = CuckooSet::with_config(CuckooSetConfig::new(64).with_stripe_count(8)).unwrap();
        assert_eq!(set.locks.stripe_count(), 8);
        for k in 0u64..100 {
            set.add(k);
        }
        assert_eq!(set.size(), 100);
    }

    #[test]
    fn rejects_stripe_count_that_does_not_divide_initial_capacity() {
        let err = CuckooSet::<u64>::with_config(CuckooSetConfig::new(4).with_stripe_count(64))
            .unwrap_err();
        assert_eq!(
            err,
            CuckooError::StripeCountNotDivisor {
                initial_capacity: 4,
                stripe_count: 64,
            }
        );
    }
}
