//! Shared response cache.
//!
//! Every expensive operation checks here first. The cache is an optimization,
//! never a dependency: lookups fail open and writes are best-effort.

pub mod fingerprint;
pub mod memory;
pub mod redis_store;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use fingerprint::{Family, Fingerprint};
pub use memory::MemoryCache;
pub use redis_store::RedisCache;

/// Lifetime of every cached response. Not configurable per entry.
pub const ENTRY_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Key/value store with expiring entries.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheError>;
}

/// Typed, fail-open front for a [`KeyValueCache`].
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueCache>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueCache>) -> Self {
        Self { store }
    }

    /// Returns the cached payload, or `None` on a miss, a store failure, or a
    /// payload that no longer decodes as `T`.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &Fingerprint) -> Option<T> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss: {key}");
                return None;
            }
            Err(e) => {
                warn!("Cache lookup failed for {key}, treating as miss: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cached payload for {key} did not decode, treating as miss: {e}");
                None
            }
        }
    }

    /// Writes `value` with [`ENTRY_TTL`]. Failures are logged and swallowed.
    pub async fn store<T: Serialize>(&self, key: &Fingerprint, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize payload for {key}: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set_with_expiry(key.as_str(), &raw, ENTRY_TTL).await {
            warn!("Cache write failed for {key}: {e}");
        }
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its
    /// success. Errors from `compute` are returned and never cached.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &Fingerprint, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        if let Some(hit) = self.lookup(key).await {
            info!(
                "Cache hit for {key} ({} ms)",
                started.elapsed().as_millis()
            );
            return Ok(hit);
        }

        let value = compute().await?;
        self.store(key, &value).await;
        info!(
            "Computed and cached {key} ({} ms)",
            started.elapsed().as_millis()
        );
        Ok(value)
    }
}
