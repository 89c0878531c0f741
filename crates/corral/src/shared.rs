//! Thread-safe cache facade
//!
//! A thin forwarding layer: every call acquires one exclusive lock, runs the
//! corresponding core operation, and releases the lock. Reads go through the
//! same lock because `get` mutates recency order and statistics. Operations
//! never hold the lock across calls, so the read-then-write atomicity of the
//! CAS and get-and-* operations comes from staying inside a single call.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;

use crate::cache::Cache;
use crate::error::Result;
use crate::policy::EvictionPolicy;
use crate::stats::CacheStats;

/// Cloneable, thread-safe handle to a [`Cache`].
///
/// Clones share the same underlying cache. Values are returned by clone so
/// no borrow outlives the critical section.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<Cache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared cache with the given capacity and policy
    pub fn new(capacity: usize, policy: EvictionPolicy, stats_enabled: bool) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(Cache::new(capacity, policy, stats_enabled)?)),
        })
    }

    /// Create a shared cache with an eviction callback.
    ///
    /// The callback runs synchronously under the cache lock; it must not
    /// call back into this cache or it will deadlock.
    pub fn with_evict<F>(
        capacity: usize,
        policy: EvictionPolicy,
        on_evict: F,
        stats_enabled: bool,
    ) -> Result<Self>
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        Ok(Self {
            inner: Arc::new(Mutex::new(Cache::with_evict(
                capacity,
                policy,
                on_evict,
                stats_enabled,
            )?)),
        })
    }

    /// Insert a key-value pair, updating in place if the key is present
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Insert only if the key is absent; returns whether an insertion
    /// happened
    pub fn put_if_absent(&self, key: K, value: V) -> bool {
        self.inner.lock().put_if_absent(key, value)
    }

    /// Look up a value, promoting the entry on a hit
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Compare-and-swap replace; see [`Cache::replace_if`]
    pub fn replace_if(&self, key: &K, expected: &V, new: V) -> bool
    where
        V: PartialEq,
    {
        self.inner.lock().replace_if(key, expected, new)
    }

    /// Unconditional replace; see [`Cache::replace`]
    pub fn replace(&self, key: &K, new: V) -> bool {
        self.inner.lock().replace(key, new)
    }

    /// Swap in a new value and return the prior one
    pub fn get_and_replace(&self, key: &K, new: V) -> Option<V> {
        self.inner.lock().get_and_replace(key, new)
    }

    /// Remove the entry if present
    pub fn remove(&self, key: &K) -> bool {
        self.inner.lock().remove(key)
    }

    /// Compare-and-swap delete; see [`Cache::remove_if`]
    pub fn remove_if(&self, key: &K, expected: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.lock().remove_if(key, expected)
    }

    /// Remove the entry and return its value
    pub fn get_and_remove(&self, key: &K) -> Option<V> {
        self.inner.lock().get_and_remove(key)
    }

    /// Apply `put` once per pair, all under one lock acquisition
    pub fn put_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.inner.lock().put_all(entries);
    }

    /// Look up each key, returning a map of those found
    pub fn get_all(&self, keys: &[K]) -> HashMap<K, V, RandomState> {
        self.inner.lock().get_all(keys)
    }

    /// Apply the compare-and-swap remove once per pair
    pub fn remove_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        V: PartialEq,
    {
        self.inner.lock().remove_all(entries);
    }

    /// Empty the cache, firing the callback once per entry
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Snapshot of all keys, least-recently-used first
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys()
    }

    /// Existence check; no promotion, no stats
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Current entry count
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Fixed capacity set at construction
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Snapshot of the usage counters, taken under the cache lock
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
