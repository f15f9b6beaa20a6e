use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task;

use super::TrafficCache;
use crate::TrafficError;
use crate::models::TrafficStatusResponse;

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    value: TrafficStatusResponse,
    expires_at: u64, // Unix timestamp (seconds)
}

/// On-disk cache backed by a fjall keyspace; entries are postcard-encoded
pub struct PersistentCache {
    store: Keyspace,
    ttl: Duration,
    // serializes writes with expiry eviction
    write_lock: Mutex<()>,
}

fn cache_err(err: impl std::fmt::Display) -> TrafficError {
    TrafficError::cache(err.to_string())
}

fn unix_now() -> crate::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(cache_err)?
        .as_secs())
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> crate::Result<Option<Vec<u8>>> {
    Ok(store.get(key).map_err(cache_err)?.map(|v| v.to_vec()))
}

impl PersistentCache {
    /// Opens (or creates) the cache database at `path`.
    pub fn open(path: impl AsRef<Path>, ttl: Duration) -> crate::Result<Self> {
        let db = fjall::Database::builder(&path).open().map_err(cache_err)?;
        let items = db
            .keyspace("traffic_status", fjall::KeyspaceCreateOptions::default)
            .map_err(cache_err)?;
        Ok(PersistentCache {
            store: items,
            ttl,
            write_lock: Mutex::new(()),
        })
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> crate::Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(cache_err)?
            .map_err(cache_err)?;
        Ok(())
    }

    /// Removes `key` only if it still holds `stale`, so a fresh concurrent
    /// `set` survives expiry of the entry it replaced.
    async fn evict_if_unchanged(&self, key: &str, stale: Vec<u8>) -> crate::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || -> crate::Result<bool> {
            let current = get_from_store(store.clone(), key.clone())?;
            if current.as_deref() != Some(stale.as_slice()) {
                return Ok(false);
            }
            store.remove(key).map_err(cache_err)?;
            Ok(true)
        })
        .await
        .map_err(cache_err)?
    }
}

#[async_trait]
impl TrafficCache for PersistentCache {
    /// Retrieves a value if it exists and has not expired.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> crate::Result<Option<TrafficStatusResponse>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(cache_err)??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes).map_err(cache_err)?;
        if unix_now()? < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            if !self.evict_if_unchanged(key, bytes).await? {
                tracing::debug!("Key refreshed concurrently, kept");
            }
            Ok(None)
        }
    }

    /// Stores a value with the cache's time-to-live.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: TrafficStatusResponse) -> crate::Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = unix_now()?
            .checked_add(self.ttl.as_secs())
            .ok_or_else(|| TrafficError::cache("TTL overflow"))?;
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry).map_err(cache_err)?;

        let _guard = self.write_lock.lock().await;
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(cache_err)?
            .map_err(cache_err)?;
        Ok(())
    }
}
