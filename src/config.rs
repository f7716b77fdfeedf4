//! Construction-time configuration for [`crate::CuckooSet`].

use crate::error::{CuckooError, Result};

/// Configuration accepted by [`crate::CuckooSet::with_config`].
///
/// The common case is [`crate::CuckooSet::new`], which is equivalent to
/// `with_config(CuckooSetConfig::new(initial_capacity))`: the stripe count
/// defaults to the initial capacity. Pinning a distinct `stripe_count` is
/// useful when the caller expects capacity to grow far beyond what makes a
/// reasonable lock-array size (e.g. a handful of stripes per core rather
/// than one per initial bucket) — the stripe count never changes after
/// construction, regardless of how many times the table resizes.
#[derive(Debug, Clone, Copy)]
pub struct CuckooSetConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) stripe_count: usize,
}

impl CuckooSetConfig {
    /// A config with `stripe_count` defaulted to `initial_capacity`.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            stripe_count: initial_capacity,
        }
    }

    /// Pin the lock-stripe count to a value independent of `initial_capacity`.
    /// Must stay constant for the lifetime of the set, and must evenly
    /// divide `initial_capacity` — checked by [`Self::validate`].
    pub fn with_stripe_count(mut self, stripe_count: usize) -> Self {
        self.stripe_count = stripe_count;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(CuckooError::InvalidCapacity(self.initial_capacity));
        }
        if self.stripe_count == 0 {
            return Err(CuckooError::InvalidCapacity(self.stripe_count));
        }
        // Capacity only ever doubles from initial_capacity, so every
        // capacity the set will ever have stays a multiple of it; requiring
        // stripe_count to divide initial_capacity here is what keeps it
        // dividing capacity for the set's whole lifetime.
        if self.initial_capacity % self.stripe_count != 0 {
            return Err(CuckooError::StripeCountNotDivisor {
                initial_capacity: self.initial_capacity,
                stripe_count: self.stripe_count,
            });
        }
        Ok(())
    }
}
