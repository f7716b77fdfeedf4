//! Error type for construction-time misuse.
//!
//! Every steady-state operation (`contains`, `add`, `remove`, `size`,
//! `populate`) reports its outcome as a plain `bool`; the only way the
//! public API can fail is at construction, when the requested capacity
//! or stripe count makes no sense.

use thiserror::Error;

/// Errors returned while constructing a [`crate::CuckooSet`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuckooError {
    /// `initial_capacity` (or an explicitly configured stripe count) was zero.
    #[error("capacity must be a positive integer, got {0}")]
    InvalidCapacity(usize),

    /// An explicitly configured `stripe_count` does not evenly divide
    /// `initial_capacity`. Two bucket indices that collide mod `capacity`
    /// must always collide mod `stripe_count` too, or a stripe no longer
    /// covers every bucket that maps to it and unrelated keys can mutate
    /// the same probe set under different locks.
    #[error(
        "stripe_count ({stripe_count}) must evenly divide initial_capacity ({initial_capacity})"
    )]
    StripeCountNotDivisor {
        initial_capacity: usize,
        stripe_count: usize,
    },
}

/// Result type alias for fallible construction.
pub type Result<T> = std::result::Result<T, CuckooError>;
