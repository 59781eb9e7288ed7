use super::{CacheStats, CacheStore};
use crate::catalog::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// A stored value and the instant it stops being readable
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Process-local cache tier.
///
/// Entries live in a sharded map, so operations on different keys do not
/// contend on one lock and a reader never sees a half-written entry. Expiry is
/// checked on every read; [`MemoryStore::spawn_sweeper`] additionally removes
/// entries nobody reads again.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a live value, dropping the entry if it has expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
            debug!("Cache entry expired on read: {}", key);
        }

        None
    }

    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_owned(), entry);
    }

    /// Remove every expired entry, returning how many were removed.
    ///
    /// Shards are locked one at a time, so keys in other shards stay
    /// available during a sweep.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();

        CacheStats {
            count: keys.len(),
            keys,
        }
    }

    /// Start a background task sweeping expired entries every `every`.
    ///
    /// Must be called from within a Tokio runtime. The task stops when the
    /// returned handle is dropped or shut down.
    pub fn spawn_sweeper(&self, every: Duration) -> SweeperHandle {
        let store = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; nothing has expired yet.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = store.sweep();
                if removed > 0 {
                    info!(
                        "Cache cleanup: removed {} expired entries. Current size: {}",
                        removed,
                        store.len()
                    );
                }
            }
        });

        SweeperHandle { task: Some(task) }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(Self::get(self, key))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        Self::set(self, key, value, ttl);
        Ok(())
    }

    async fn stats(&self) -> Option<CacheStats> {
        Some(Self::stats(self))
    }
}

/// Owns the background sweep task of a [`MemoryStore`]
#[derive(Debug)]
pub struct SweeperHandle {
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop sweeping and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}
