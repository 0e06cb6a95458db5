//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

// == Sweeper Handle ==
/// Owner of a running cleanup task.
///
/// Dropping the handle closes the shutdown channel, which also ends the task,
/// so a sweeper never outlives the cache that owns it.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the task and waits until it has terminated.
    pub async fn stop(self) {
        // Err only means the task already exited and dropped its receiver
        let _ = self.shutdown.send(true);

        if let Err(err) = self.handle.await {
            warn!("TTL cleanup task ended abnormally: {}", err);
        }
    }

    /// Returns true once the task has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for `interval` between runs and takes the write lock for
/// each pass, so a pass blocks readers and writers for a time proportional to
/// the table size. It runs until [`SweeperHandle::stop`] is called or the
/// handle is dropped.
///
/// # Arguments
/// * `cache` - Shared reference to the cache table
/// * `interval` - Time between cleanup runs
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String, String>::new(0)));
/// let sweeper = spawn_cleanup_task(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_cleanup_task<K, V>(
    cache: Arc<RwLock<CacheStore<K, V>>>,
    interval: Duration,
) -> SweeperHandle
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                // Resolves on an explicit stop and when the sender is dropped
                _ = shutdown_rx.changed() => break,
            }

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }

        info!("TTL cleanup task stopped");
    });

    SweeperHandle { shutdown, handle }
}
