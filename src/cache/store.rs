//! Cache Store Module
//!
//! The cache table: HashMap storage with TTL expiration, capacity
//! enforcement and hit/miss accounting. Not synchronized on its own; the
//! engine wraps it in a `RwLock`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheMetrics, CacheStats};
use crate::error::{CacheError, Result};

/// Outcome of a read-only lookup.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lookup<V> {
    /// Live entry, hit already recorded
    Hit(V),
    /// No entry, miss already recorded
    Missing,
    /// Entry present but expired; nothing recorded, caller must retry with
    /// exclusive access
    Expired,
}

// == Cache Store ==
/// Key/value table with TTL support and an optional capacity bound.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Hit/miss/expiry counters
    metrics: CacheMetrics,
    /// Maximum number of live entries, 0 = unbounded
    max_size: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of live entries, 0 for unbounded
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            metrics: CacheMetrics::new(),
            max_size,
        }
    }

    // == Set ==
    /// Stores a key-value pair, replacing any existing entry wholesale.
    ///
    /// Capacity only limits growth in distinct keys: overwriting an existing
    /// key always succeeds. When the table is full, expired entries are
    /// purged before the insert is rejected, since they are no longer live.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Time to live, `Duration::ZERO` for no expiry
    pub fn set(&mut self, key: K, value: V, ttl: Duration) -> Result<()> {
        if self.max_size > 0
            && self.entries.len() >= self.max_size
            && !self.entries.contains_key(&key)
        {
            self.cleanup_expired();
            if self.entries.len() >= self.max_size {
                debug!(max_size = self.max_size, "Rejected insert, cache full");
                return Err(CacheError::CacheFull(self.max_size));
            }
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key with exclusive access.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                self.metrics.record_hit();
                return Ok(entry.value.clone());
            }
            None => false,
        };

        self.metrics.record_miss();
        if expired {
            self.entries.remove(key);
            self.metrics.record_expired(1);
            debug!("Removed expired entry on lookup");
            Err(CacheError::Expired)
        } else {
            Err(CacheError::NotFound)
        }
    }

    /// Read-only lookup usable under a shared lock.
    ///
    /// Records the hit or miss for live and absent keys. Expired entries are
    /// reported without touching the counters so the caller can settle them
    /// through [`CacheStore::get`].
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Lookup<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => Lookup::Expired,
            Some(entry) => {
                self.metrics.record_hit();
                Lookup::Hit(entry.value.clone())
            }
            None => {
                self.metrics.record_miss();
                Lookup::Missing
            }
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of a live key, None if it never expires.
    ///
    /// Does not count as a lookup and does not remove expired entries.
    pub fn ttl<Q>(&self, key: &Q) -> Result<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => Err(CacheError::Expired),
            Some(entry) => Ok(entry.ttl_remaining()),
            None => Err(CacheError::NotFound),
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Idempotent: deleting an absent key is not an error. Returns whether an
    /// entry was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).is_some()
    }

    // == Flush ==
    /// Removes every entry. Counters are left untouched.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Expiry is judged against a single scan start time. Returns the number
    /// of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.metrics.record_expired(removed as u64);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.entries.len())
    }

    /// Returns the configured capacity, 0 = unbounded.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Length ==
    /// Returns the number of resident entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
