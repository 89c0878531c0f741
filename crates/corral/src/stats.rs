//! Cache statistics tracking

/// Snapshot of cache usage counters.
///
/// `items` tracks the current entry count; the other counters are cumulative
/// for the lifetime of the cache and survive [`clear`](crate::Cache::clear).
/// `hits + misses == gets` holds after every operation. Counters are only
/// recorded when the cache was constructed with stats enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently in the cache
    pub items: u64,
    /// Total lookup attempts
    pub gets: u64,
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Entries evicted, by capacity pressure or explicit removal
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}
