//! Traffic status cache
//!
//! Stores resolved statuses under the normalized query with a fixed
//! time-to-live. Two backends are provided: a process-local map and an
//! on-disk keyspace that survives restarts.

pub mod memory;
pub mod persistent;

use std::time::Duration;

use async_trait::async_trait;

use crate::models::TrafficStatusResponse;

pub use memory::MemoryCache;
pub use persistent::PersistentCache;

/// Default lifetime of a cached status
pub const DEFAULT_TTL: Duration = Duration::from_secs(180);

/// Keyed store with TTL expiry
#[async_trait]
pub trait TrafficCache: Send + Sync {
    /// Returns the stored status, or `None` if absent or expired.
    async fn get(&self, key: &str) -> crate::Result<Option<TrafficStatusResponse>>;

    /// Stores a status, replacing any previous value for the key.
    async fn set(&self, key: &str, value: TrafficStatusResponse) -> crate::Result<()>;
}
