//! Bounded recency-ordered cache core
//!
//! Single-threaded by design: every operation takes `&mut self`, and thread
//! safety comes from the [`SharedCache`](crate::SharedCache) facade wrapping
//! each call in one exclusive critical section.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::RecencyList;
use crate::policy::EvictionPolicy;
use crate::stats::CacheStats;

/// Callback invoked when an entry leaves the cache, whether by capacity
/// pressure or explicit removal. Called synchronously after the cache's own
/// bookkeeping is complete; it must not call back into the same cache.
pub type EvictionCallback<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// Bounded key/value cache with recency-based eviction.
///
/// Composes a hash index (key to node handle) with a recency-ordered list.
/// The fixed capacity is enforced on every insertion: putting a new key into
/// a full cache evicts exactly one entry, chosen by the [`EvictionPolicy`].
/// Reads are touches — a successful `get` promotes the entry to
/// most-recently-used.
pub struct Cache<K, V> {
    index: HashMap<K, usize, RandomState>,
    list: RecencyList<K, V>,
    capacity: usize,
    policy: EvictionPolicy,
    on_evict: Option<EvictionCallback<K, V>>,
    stats_enabled: bool,
    stats: CacheStats,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache with the given capacity and policy.
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is zero; this is the
    /// only failure mode in the whole component.
    pub fn new(capacity: usize, policy: EvictionPolicy, stats_enabled: bool) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Self {
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: RecencyList::with_capacity(capacity),
            capacity,
            policy,
            on_evict: None,
            stats_enabled,
            stats: CacheStats::default(),
        })
    }

    /// Create a cache that reports every departing entry to `on_evict`
    pub fn with_evict<F>(
        capacity: usize,
        policy: EvictionPolicy,
        on_evict: F,
        stats_enabled: bool,
    ) -> Result<Self>
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        let mut cache = Self::new(capacity, policy, stats_enabled)?;
        cache.on_evict = Some(Box::new(on_evict));
        Ok(cache)
    }

    /// Insert a key-value pair, updating in place if the key is present.
    ///
    /// Either way the entry ends up most-recently-used. Inserting a new key
    /// into a full cache first evicts one entry per the policy.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.list.move_to_front(idx);
            self.list.set_value(idx, value);
            return;
        }

        self.insert_new(key, value);
    }

    /// Insert only if the key is absent; returns whether an insertion
    /// happened. An existing entry is neither touched nor promoted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        self.insert_new(key, value);
        true
    }

    /// Look up a value, promoting the entry to most-recently-used on a hit.
    ///
    /// Counts toward `gets` and either `hits` or `misses`.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.stats_enabled {
            self.stats.gets += 1;
        }

        if let Some(&idx) = self.index.get(key) {
            if self.stats_enabled {
                self.stats.hits += 1;
            }
            self.list.move_to_front(idx);
            self.list.value(idx)
        } else {
            if self.stats_enabled {
                self.stats.misses += 1;
            }
            None
        }
    }

    /// Compare-and-swap: replace the value only if the key is present and
    /// its current value equals `expected`. Promotes on success. Absence and
    /// value mismatch both return `false` with no mutation.
    pub fn replace_if(&mut self, key: &K, expected: &V, new: V) -> bool
    where
        V: PartialEq,
    {
        if let Some(&idx) = self.index.get(key) {
            if self.list.value(idx) == Some(expected) {
                self.list.move_to_front(idx);
                self.list.set_value(idx, new);
                return true;
            }
        }
        false
    }

    /// Unconditionally swap the value if the key is present, ignoring the
    /// current value. Promotes on success; returns whether the key existed.
    pub fn replace(&mut self, key: &K, new: V) -> bool {
        if let Some(&idx) = self.index.get(key) {
            self.list.move_to_front(idx);
            self.list.set_value(idx, new);
            return true;
        }
        false
    }

    /// Swap in a new value and return the prior one, or `None` (with no
    /// mutation) if the key is absent. Counts as a `get`.
    pub fn get_and_replace(&mut self, key: &K, new: V) -> Option<V> {
        if self.stats_enabled {
            self.stats.gets += 1;
        }

        if let Some(&idx) = self.index.get(key) {
            if self.stats_enabled {
                self.stats.hits += 1;
            }
            self.list.move_to_front(idx);
            self.list.set_value(idx, new)
        } else {
            if self.stats_enabled {
                self.stats.misses += 1;
            }
            None
        }
    }

    /// Remove the entry if present, firing the eviction callback exactly as
    /// a capacity-triggered eviction would. Returns whether a removal
    /// happened.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.remove_node(idx);
                true
            }
            None => false,
        }
    }

    /// Compare-and-swap delete: remove only if the key is present and its
    /// current value equals `expected`. No mutation on mismatch or absence.
    pub fn remove_if(&mut self, key: &K, expected: &V) -> bool
    where
        V: PartialEq,
    {
        if let Some(&idx) = self.index.get(key) {
            if self.list.value(idx) == Some(expected) {
                self.remove_node(idx);
                return true;
            }
        }
        false
    }

    /// Remove the entry and return its value, or `None` if the key is
    /// absent. Counts as a `get`; fires the eviction callback on removal.
    pub fn get_and_remove(&mut self, key: &K) -> Option<V> {
        if self.stats_enabled {
            self.stats.gets += 1;
        }

        if let Some(&idx) = self.index.get(key) {
            if self.stats_enabled {
                self.stats.hits += 1;
            }
            let (_, value) = self.remove_node(idx)?;
            Some(value)
        } else {
            if self.stats_enabled {
                self.stats.misses += 1;
            }
            None
        }
    }

    /// Apply [`put`](Cache::put) once per pair.
    ///
    /// No atomicity across the batch: each key is independently subject to
    /// promotion and eviction, and input order carries no meaning.
    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    /// Look up each key, returning a map of those found. Every lookup is a
    /// full [`get`](Cache::get): it promotes and counts stats.
    pub fn get_all(&mut self, keys: &[K]) -> HashMap<K, V, RandomState> {
        let mut found = HashMap::with_capacity_and_hasher(keys.len(), RandomState::new());
        for key in keys {
            if let Some(value) = self.get(key).cloned() {
                found.insert(key.clone(), value);
            }
        }
        found
    }

    /// Apply the compare-and-swap [`remove_if`](Cache::remove_if) once per
    /// pair.
    pub fn remove_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        V: PartialEq,
    {
        for (key, value) in entries {
            self.remove_if(&key, &value);
        }
    }

    /// Empty the cache, evicting every entry oldest-first and firing the
    /// callback once per entry. Cumulative counters (`gets`, `hits`,
    /// `misses`, `evictions`) are preserved; only `items` drops to zero.
    pub fn clear(&mut self) {
        while let Some(idx) = self.list.back() {
            self.remove_node(idx);
        }
    }

    /// Snapshot of all keys ordered least-recently-used first.
    ///
    /// Does not count as a touch: no promotion, no stats.
    pub fn keys(&self) -> Vec<K> {
        self.list.iter_oldest_first().map(|(k, _)| k.clone()).collect()
    }

    /// Existence check; no promotion, no stats
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current entry count
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Fixed capacity set at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Eviction policy set at construction
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Whether statistics are being recorded
    pub fn stats_enabled(&self) -> bool {
        self.stats_enabled
    }

    /// Snapshot of the usage counters. All zero if stats are disabled.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn insert_new(&mut self, key: K, value: V) {
        // Make room first so capacity is never exceeded, even transiently.
        // For LRU the victim (tail) is the same either way; for MRU this
        // sacrifices the previous front rather than the entry being inserted.
        if self.list.len() == self.capacity {
            self.evict_one();
        }

        let idx = self.list.push_front(key.clone(), value);
        self.index.insert(key, idx);

        if self.stats_enabled {
            self.stats.items += 1;
        }
    }

    fn evict_one(&mut self) {
        let victim = match self.policy {
            EvictionPolicy::Lru => self.list.back(),
            EvictionPolicy::Mru => self.list.front(),
        };

        if let Some(idx) = victim {
            self.remove_node(idx);
        }
    }

    /// Detach the node, drop its index mapping, update counters, then fire
    /// the callback. Bookkeeping completes before the callback runs, so a
    /// panicking callback cannot leave the structures inconsistent.
    fn remove_node(&mut self, idx: usize) -> Option<(K, V)> {
        let (key, value) = self.list.detach(idx)?;
        self.index.remove(&key);

        if self.stats_enabled {
            self.stats.evictions += 1;
            self.stats.items -= 1;
        }

        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(&key, &value);
        }

        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    use parking_lot::Mutex;

    fn lru(capacity: usize) -> Cache<i32, i32> {
        Cache::new(capacity, EvictionPolicy::Lru, true).unwrap()
    }

    fn mru(capacity: usize) -> Cache<i32, i32> {
        Cache::new(capacity, EvictionPolicy::Mru, true).unwrap()
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            Cache::<i32, i32>::new(0, EvictionPolicy::Lru, false).err(),
            Some(Error::ZeroCapacity)
        );
    }

    #[test]
    fn test_put_get_roundtrip() {
        let mut cache = lru(4);

        cache.put(1, 10);
        cache.put(2, 20);

        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.get(&2), Some(&20));
        // Get is a touch: 1 then 2 were promoted, so oldest-first is [1, 2]
        assert_eq!(cache.keys(), vec![1, 2]);
    }

    #[test]
    fn test_capacity_bound() {
        let mut cache = lru(3);

        for i in 0..10 {
            cache.put(i, i);
            assert!(cache.len() <= 3);
        }
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = lru(3);

        for i in 0..6 {
            cache.put(i, i);
        }

        // Survivors are the 3 newest, oldest-first
        assert_eq!(cache.keys(), vec![3, 4, 5]);
        assert!(!cache.contains_key(&2));
    }

    #[test]
    fn test_lru_promotion_changes_victim() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.get(&1); // 2 is now least-recently-used
        cache.put(3, 30);

        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&30));
    }

    #[test]
    fn test_put_existing_does_not_evict() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(1, 11); // Update in place, no eviction

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(&11));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_mru_keeps_latest() {
        let mut cache = mru(1);

        cache.put(1, 1);
        cache.put(2, 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(&2));
        assert!(!cache.contains_key(&1));
    }

    #[test]
    fn test_mru_evicts_front() {
        let mut cache = mru(3);

        cache.put(0, 0);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3); // 2 was most-recently-used

        assert_eq!(cache.keys(), vec![0, 1, 3]);

        cache.get(&0); // Promote 0
        cache.put(4, 4); // Now 0 is the victim

        assert_eq!(cache.keys(), vec![1, 3, 4]);
    }

    #[test]
    fn test_put_if_absent() {
        let mut cache = lru(2);

        assert!(cache.put_if_absent(1, 10));
        assert!(!cache.put_if_absent(1, 99));
        assert_eq!(cache.get(&1), Some(&10));
    }

    #[test]
    fn test_put_if_absent_does_not_promote() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.put_if_absent(1, 99); // No touch on existing key
        cache.put(3, 30); // 1 is still least-recently-used

        assert!(!cache.contains_key(&1));
        assert_eq!(cache.keys(), vec![2, 3]);
    }

    #[test]
    fn test_replace_if_cas() {
        let mut cache = lru(2);

        cache.put(1, 10);

        assert!(!cache.replace_if(&1, &99, 11)); // Value mismatch
        assert!(!cache.replace_if(&2, &10, 11)); // Key absent
        assert_eq!(cache.get(&1), Some(&10));

        assert!(cache.replace_if(&1, &10, 11));
        assert_eq!(cache.get(&1), Some(&11));
    }

    #[test]
    fn test_replace_if_promotes() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.put(2, 20);
        assert!(cache.replace_if(&1, &10, 11));
        cache.put(3, 30); // 2 is the victim now

        assert_eq!(cache.keys(), vec![1, 3]);
    }

    #[test]
    fn test_replace_unconditional() {
        let mut cache = lru(2);

        cache.put(1, 10);

        assert!(cache.replace(&1, 42)); // Current value ignored
        assert!(!cache.replace(&2, 42));
        assert_eq!(cache.get(&1), Some(&42));
    }

    #[test]
    fn test_get_and_replace() {
        let mut cache = lru(2);

        cache.put(1, 10);

        assert_eq!(cache.get_and_replace(&1, 11), Some(10));
        assert_eq!(cache.get_and_replace(&2, 99), None);
        assert_eq!(cache.get(&1), Some(&11));
        assert!(!cache.contains_key(&2));

        // Both calls counted as gets: one hit, one miss
        let stats = cache.stats();
        assert_eq!(stats.gets, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_remove() {
        let mut cache = lru(3);

        cache.put(1, 10);
        cache.put(2, 20);

        assert!(cache.remove(&1));
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains_key(&1));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_remove_absent_is_idempotent() {
        let mut cache = lru(3);

        cache.put(1, 10);

        assert!(!cache.remove(&7));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_remove_if_cas() {
        let mut cache = lru(3);

        cache.put(1, 10);

        assert!(!cache.remove_if(&1, &99)); // Value mismatch
        assert!(!cache.remove_if(&2, &10)); // Key absent
        assert_eq!(cache.len(), 1);

        assert!(cache.remove_if(&1, &10));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_get_and_remove() {
        let mut cache = lru(3);

        cache.put(1, 10);

        assert_eq!(cache.get_and_remove(&1), Some(10));
        assert_eq!(cache.get_and_remove(&1), None);
        assert_eq!(cache.len(), 0);

        let stats = cache.stats();
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_stats_accuracy() {
        let mut cache = lru(128);

        for i in 0..256 {
            cache.put(i, i);
        }

        let stats = cache.stats();
        assert_eq!(stats.items, 128);
        assert_eq!(stats.evictions, 128);
        assert_eq!(cache.len(), 128);

        cache.get(&0); // Evicted: miss
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);

        cache.get(&200); // Present: hit
        let stats = cache.stats();
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_stats_disabled() {
        let mut cache: Cache<i32, i32> = Cache::new(2, EvictionPolicy::Lru, false).unwrap();

        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(3, 30);
        cache.get(&3);
        cache.get(&99);

        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.len(), 2); // Capacity still enforced
    }

    #[test]
    fn test_keys_is_not_a_touch() {
        let mut cache = lru(3);

        cache.put(1, 10);
        cache.put(2, 20);

        let before = cache.stats();
        assert_eq!(cache.keys(), vec![1, 2]);
        assert_eq!(cache.keys(), vec![1, 2]);
        assert_eq!(cache.stats(), before);
    }

    #[test]
    fn test_contains_key_is_not_a_touch() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.put(2, 20);
        assert!(cache.contains_key(&1));
        cache.put(3, 30); // 1 was not promoted, so it is the victim

        assert!(!cache.contains_key(&1));
        assert_eq!(cache.stats().gets, 0);
    }

    #[test]
    fn test_clear_preserves_cumulative_counters() {
        let mut cache = lru(4);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.get(&1);
        cache.get(&9);

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());

        let stats = cache.stats();
        assert_eq!(stats.items, 0);
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_eviction_callback_on_overflow() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&evicted);
        let mut cache = Cache::with_evict(
            2,
            EvictionPolicy::Lru,
            move |k: &i32, v: &i32| log.lock().push((*k, *v)),
            true,
        )
        .unwrap();

        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(3, 30);

        assert_eq!(*evicted.lock(), vec![(1, 10)]);
    }

    #[test]
    fn test_eviction_callback_on_explicit_remove() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&evicted);
        let mut cache = Cache::with_evict(
            4,
            EvictionPolicy::Lru,
            move |k: &i32, v: &i32| log.lock().push((*k, *v)),
            true,
        )
        .unwrap();

        cache.put(1, 10);
        cache.put(2, 20);
        cache.remove(&1);
        cache.clear();

        // Explicit removal and clear report through the same channel
        assert_eq!(*evicted.lock(), vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn test_callback_panic_leaves_cache_consistent() {
        let mut cache = Cache::with_evict(
            2,
            EvictionPolicy::Lru,
            |_k: &i32, _v: &i32| panic!("callback failed"),
            true,
        )
        .unwrap();

        cache.put(1, 10);
        cache.put(2, 20);

        let result = catch_unwind(AssertUnwindSafe(|| cache.put(3, 30)));
        assert!(result.is_err());

        // Bookkeeping completed before the callback ran: the victim is gone,
        // the interrupted insertion never happened, and counters still match
        // the structure.
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains_key(&1));
        assert!(!cache.contains_key(&3));
        assert_eq!(cache.keys(), vec![2]);

        let stats = cache.stats();
        assert_eq!(stats.items, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(cache.get(&2), Some(&20));
    }

    #[test]
    fn test_batch_operations() {
        let mut cache = lru(8);

        cache.put_all(vec![(1, 10), (2, 20)]);
        assert_eq!(cache.len(), 2);

        let found = cache.get_all(&[1, 2, 3]);
        assert_eq!(found.len(), 2);
        assert_eq!(found.get(&1), Some(&10));
        assert_eq!(found.get(&2), Some(&20));
        assert_eq!(found.get(&3), None);

        // CAS semantics per pair: only matching values are removed
        cache.remove_all(vec![(1, 10), (2, 99)]);
        assert!(!cache.contains_key(&1));
        assert_eq!(cache.get(&2), Some(&20));
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut cache = lru(2);

        cache.put(1, 10);
        cache.remove(&1);
        cache.put(1, 11);

        assert_eq!(cache.get(&1), Some(&11));
        assert_eq!(cache.len(), 1);
    }
}
