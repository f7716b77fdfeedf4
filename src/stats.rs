//! Lightweight, diagnostic-only counters. Not part of the correctness
//! contract — just cheap atomics a caller can read to see how much
//! relocation and resizing a workload is causing.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    resizes: AtomicU64,
    relocation_attempts: AtomicU64,
    relocation_successes: AtomicU64,
    max_relocation_chain: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn record_resize(&self) {
        self.resizes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_relocation_attempt(&self) {
        self.relocation_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_relocation_success(&self, chain_len: usize) {
        self.relocation_successes.fetch_add(1, Ordering::Relaxed);
        self.max_relocation_chain.fetch_max(chain_len, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SetStats {
        SetStats {
            resizes: self.resizes.load(Ordering::Relaxed),
            relocation_attempts: self.relocation_attempts.load(Ordering::Relaxed),
            relocation_successes: self.relocation_successes.load(Ordering::Relaxed),
            max_relocation_chain: self.max_relocation_chain.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of diagnostic counters for a [`crate::CuckooSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetStats {
    /// Total number of times the table has doubled in capacity.
    pub resizes: u64,
    /// Total number of relocation chains started.
    pub relocation_attempts: u64,
    /// Total number of relocation chains that ended by placing the victim
    /// rather than forcing a resize.
    pub relocation_successes: u64,
    /// Longest relocation chain observed so far.
    pub max_relocation_chain: usize,
}
