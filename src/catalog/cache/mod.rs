//! Tiered key/value cache with TTL expiry.
//!
//! [`MemoryStore`] is the process-local tier, [`RemoteStore`] talks to a shared
//! cache server, and [`TieredStore`] puts the two behind one [`CacheStore`]
//! with a per-operation fallback to the local tier.

mod key;
mod memory;
mod remote;
mod tiered;

pub use key::CacheKey;
pub use memory::{MemoryStore, SweeperHandle};
pub use remote::RemoteStore;
pub use tiered::TieredStore;

use crate::catalog::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Cache backend contract.
///
/// Values are opaque JSON. Reading a key after its TTL has elapsed must behave
/// exactly like reading a key that was never written.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a live value, `Ok(None)` on miss.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write (or overwrite) a value that expires after `ttl`.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Entry statistics, for backends that can report them.
    async fn stats(&self) -> Option<CacheStats> {
        None
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Resident entries, including expired ones awaiting the next sweep
    pub count: usize,
    /// Resident keys, sorted
    pub keys: Vec<String>,
}
