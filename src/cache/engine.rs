//! Cache Engine Module
//!
//! Thread-safe cache handle combining the guarded table with its background
//! sweeper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::store::Lookup;
use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, SweeperHandle};

// == Cache ==
/// In-process key/value cache with TTL expiry and an optional capacity bound.
///
/// Every operation goes through a single reader/writer lock, so operations
/// are linearizable. Values are returned by clone; store `Arc<T>` to share
/// large values.
///
/// The handle is not `Clone`: share it by reference or wrap it in an `Arc`.
/// Dropping it ends the background sweeper.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Table and counters, shared with the sweeper
    store: Arc<RwLock<CacheStore<K, V>>>,
    /// Running sweeper, None once stopped
    sweeper: Mutex<Option<SweeperHandle>>,
    config: CacheConfig,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its sweeper.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `InvalidConfig` if the cleanup interval is zero
    /// - `Internal` if no Tokio runtime is available
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        tokio::runtime::Handle::try_current().map_err(|err| {
            CacheError::Internal(format!("cache requires a Tokio runtime: {}", err))
        })?;

        let store = Arc::new(RwLock::new(CacheStore::new(config.max_size)));
        let sweeper = spawn_cleanup_task(store.clone(), config.cleanup_interval);

        info!(
            "Cache created: max_size={}, cleanup_interval={}ms",
            config.max_size,
            config.cleanup_interval.as_millis()
        );

        Ok(Self {
            store,
            sweeper: Mutex::new(Some(sweeper)),
            config,
        })
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key.
    ///
    /// `ttl` of `Duration::ZERO` stores the entry without expiry.
    ///
    /// # Errors
    /// `CacheFull` if the key is new and the cache already holds `max_size`
    /// live entries.
    pub async fn set(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.store.write().await.set(key, value, ttl)
    }

    // == Get ==
    /// Retrieves a clone of the value stored for `key`.
    ///
    /// Counts one hit or one miss. An expired entry is removed by this call.
    ///
    /// # Errors
    /// - `NotFound` if the key is absent
    /// - `Expired` if the key was present but its TTL had elapsed
    pub async fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        {
            let store = self.store.read().await;
            match store.lookup(key) {
                Lookup::Hit(value) => return Ok(value),
                Lookup::Missing => return Err(CacheError::NotFound),
                Lookup::Expired => {}
            }
        }

        // A writer may have replaced or removed the key between the locks,
        // so the exclusive path judges it afresh.
        self.store.write().await.get(key)
    }

    /// Remaining lifetime of a live key; `None` if it never expires.
    ///
    /// Not counted as a hit or miss.
    pub async fn ttl<Q>(&self, key: &Q) -> Result<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.read().await.ttl(key)
    }

    // == Delete ==
    /// Removes `key` if present. Deleting an absent key is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub async fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.write().await.delete(key)
    }

    // == Flush ==
    /// Atomically removes every entry. Hit/miss counters are kept.
    pub async fn flush(&self) {
        self.store.write().await.flush();
    }

    /// Runs one sweep pass now and returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    // == Stats ==
    /// Returns a snapshot of the counters and the current entry count.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Number of resident entries, including expired ones not yet removed.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no entries are resident.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Lifecycle ==
    /// Stops the background sweeper and waits for it to exit.
    ///
    /// Idempotent. The cache keeps serving requests afterwards; expired
    /// entries are then only removed lazily by `get`, by `set` at capacity,
    /// or by [`Cache::purge_expired`].
    pub async fn stop(&self) {
        let sweeper = self.sweeper.lock().await.take();
        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
            info!("Cache sweeper stopped");
        }
    }

    /// Returns true while the background sweeper is running.
    pub async fn sweeper_running(&self) -> bool {
        self.sweeper
            .lock()
            .await
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
