use crate::catalog::{Result, cache::CacheStore};
use serde::{Serialize, de::DeserializeOwned};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Read-through cache in front of expensive producers.
///
/// Every remote or otherwise costly operation goes through [`Fetcher::cached`]:
/// a live entry is returned without running the producer, otherwise the
/// producer runs and its successful result is stored for `ttl`.
#[derive(Clone)]
pub struct Fetcher {
    store: Arc<dyn CacheStore>,
}

impl Fetcher {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Return the cached value under `key`, or run `producer` and cache its
    /// result for `ttl`.
    ///
    /// Producer errors are returned to the caller and nothing is cached. A
    /// cache read or write failure never fails the call.
    pub async fn cached<T, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.peek(key).await {
            return Ok(hit);
        }

        debug!("Cache miss: {}", key);
        let value = producer().await?;
        self.store_value(key, &value, ttl).await;

        Ok(value)
    }

    /// Like [`Fetcher::cached`], but a failed producer yields `T::default()`,
    /// which is cached for `ttl` as a known-empty result.
    pub async fn cached_or_default<T, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> T
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.peek(key).await {
            return hit;
        }

        debug!("Cache miss: {}", key);
        let value = match producer().await {
            Ok(value) => value,
            Err(e) => {
                warn!("Producer for {} failed, caching empty result: {}", key, e);
                T::default()
            }
        };
        self.store_value(key, &value, ttl).await;

        value
    }

    /// Read a cached value without producing one.
    ///
    /// A store failure or an entry of the wrong shape reads as a miss.
    pub async fn peek<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_value(raw) {
            Ok(value) => {
                debug!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring malformed cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn store_value<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cannot serialize value for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(key, raw, ttl).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

/// Await one branch of a fan-out, degrading a failure to `T::default()`.
pub async fn degrade<T, Fut>(what: &str, fut: Fut) -> T
where
    T: Default,
    Fut: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            warn!("{} unavailable: {}", what, e);
            T::default()
        }
    }
}
