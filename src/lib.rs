//! # cuckoo-set: a concurrent cuckoo hash set
//!
//! `cuckoo-set` is a fixed-load-factor-free concurrent set built on two
//! cuckoo hash tables, striped locking, and online resize. Any two keys
//! whose stripes don't overlap can be inserted, removed, or looked up
//! fully in parallel; a bucket that fills up evicts a resident into its
//! alternate table instead of chaining, and a chain that can't find room
//! anywhere doubles both tables rather than failing the insert.
//!
//! ## Example
//!
//! ```
//! use cuckoo_set::CuckooSet;
//!
//! let set = CuckooSet::new(64).unwrap();
//! assert!(set.add(42));
//! assert!(!set.add(42)); // already present
//! assert!(set.contains(&42));
//! assert!(set.remove(&42));
//! assert_eq!(set.size(), 0);
//! ```

mod config;
mod core;
mod error;
mod set;
mod stats;

pub use config::CuckooSetConfig;
pub use error::{CuckooError, Result};
pub use set::CuckooSet;
pub use stats::SetStats;
