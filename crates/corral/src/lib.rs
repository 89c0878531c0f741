//! # corral
//!
//! Bounded, recency-ordered key/value cache with LRU and MRU eviction.
//!
//! ## Architecture
//! - **Recency Index**: AHash map from key to node handle (O(1) lookup)
//! - **Recency List**: arena-backed doubly-linked list ordered by touch
//!   (O(1) promote, O(1) evict from either end)
//! - **Policy**: one decision point — which end is sacrificed on overflow
//! - **Facade**: [`SharedCache`] serializes all access behind one mutex
//!
//! The core [`Cache`] is single-threaded and lock-free in its own reasoning;
//! successful reads count as touches and promote the entry, so even lookups
//! are mutations. Conditional (compare-and-swap) replace and remove, batch
//! operations, an eviction callback, and live usage counters round out the
//! surface.

#![warn(missing_docs)]

mod cache;
mod error;
mod list;
mod policy;
mod shared;
mod stats;

pub use cache::{Cache, EvictionCallback};
pub use error::{Error, Result};
pub use policy::EvictionPolicy;
pub use shared::SharedCache;
pub use stats::CacheStats;
