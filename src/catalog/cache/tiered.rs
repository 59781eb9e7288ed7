use super::{CacheStats, CacheStore, MemoryStore, RemoteStore, SweeperHandle};
use crate::catalog::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The process-wide cache.
///
/// With a remote store configured every operation goes there first and falls
/// back to the local tier only for the operation that failed. Without one the
/// local tier answers everything. Cache operations on this store never fail.
#[derive(Debug)]
pub struct TieredStore {
    local: MemoryStore,
    remote: Option<RemoteStore>,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl TieredStore {
    pub fn new(local: MemoryStore, remote: Option<RemoteStore>) -> Self {
        Self {
            local,
            remote,
            sweeper: Mutex::new(None),
        }
    }

    /// Local-only store
    pub fn local_only() -> Self {
        Self::new(MemoryStore::new(), None)
    }

    #[must_use]
    pub const fn local(&self) -> &MemoryStore {
        &self.local
    }

    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Start the local tier's expiry sweep.
    ///
    /// Returns `false` when the sweeper was already running.
    pub fn start_sweeper(&self, every: Duration) -> bool {
        let mut sweeper = self.sweeper.lock();
        if sweeper.as_ref().is_some_and(SweeperHandle::is_running) {
            return false;
        }

        *sweeper = Some(self.local.spawn_sweeper(every));
        info!("Cache sweeper started, interval {:?}", every);
        true
    }

    /// Stop the sweep task, if one is running.
    pub async fn stop_sweeper(&self) {
        let handle = self.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
    }
}

#[async_trait]
impl CacheStore for TieredStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if let Some(remote) = &self.remote {
            match remote.get(key).await {
                Ok(value) => return Ok(value),
                Err(e) => warn!("Remote cache get failed for {}, using local tier: {}", key, e),
            }
        }

        let value = self.local.get(key);
        debug!("Local cache {}: {}", if value.is_some() { "hit" } else { "miss" }, key);
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        if let Some(remote) = &self.remote {
            match remote.set(key, value.clone(), ttl).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!("Remote cache set failed for {}, using local tier: {}", key, e),
            }
        }

        self.local.set(key, value, ttl);
        Ok(())
    }

    async fn stats(&self) -> Option<CacheStats> {
        Some(self.local.stats())
    }
}
