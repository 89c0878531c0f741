//! Eviction policy selection

/// Which end of the recency order is sacrificed when the cache is full.
///
/// The policy is consulted at exactly one point: choosing the victim for an
/// insertion into a full cache. Everything else behaves identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Evict the least-recently-used entry
    #[default]
    Lru,
    /// Evict the most-recently-used entry. With no intervening touches this
    /// degenerates to keep-only-the-latest.
    Mru,
}
