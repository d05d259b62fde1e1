//! TTL Sweep Task
//!
//! Background task that periodically purges expired entries from a memory
//! store. Reads already hide expired entries; the sweep only reclaims space.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{lock_store, SharedStore};

/// Spawns a task that purges expired entries every `interval`.
///
/// The store lock is held only for the purge itself, never across an await.
/// Abort the returned handle to stop the task.
///
/// # Example
/// ```ignore
/// let cache = MemoryAdapter::<Value>::new(&MemoryOptions::default())?;
/// let sweeper = spawn_sweep_task(cache.store_handle(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweep_task(store: SharedStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting TTL sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = lock_store(&store).purge_expired();

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
