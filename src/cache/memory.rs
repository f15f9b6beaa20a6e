use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{DEFAULT_TTL, TrafficCache};
use crate::models::TrafficStatusResponse;

struct CacheEntry {
    value: TrafficStatusResponse,
    expires_at: Instant,
}

/// In-process cache; entries vanish on restart
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl MemoryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored entries, expired ones included until next read
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl TrafficCache for MemoryCache {
    #[tracing::instrument(name = "query_memory_cache", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> crate::Result<Option<TrafficStatusResponse>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => {
                    tracing::debug!("Key not found");
                    return Ok(None);
                }
                Some(entry) if Instant::now() < entry.expires_at => {
                    tracing::debug!("Key found and still fresh");
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        tracing::debug!("Key found but expired");
        let mut entries = self.entries.write().await;
        // a concurrent set may have refreshed the entry meanwhile
        if entries
            .get(key)
            .is_some_and(|entry| Instant::now() >= entry.expires_at)
        {
            entries.remove(key);
        }
        Ok(None)
    }

    #[tracing::instrument(name = "put_memory_cache", level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: TrafficStatusResponse) -> crate::Result<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CongestionLevel, GeocodedLocation, RouteSummary, TrafficQuery,
    };
    use chrono::Utc;

    fn status(description: &str) -> TrafficStatusResponse {
        TrafficStatusResponse {
            query: TrafficQuery::parse(description).unwrap(),
            location: GeocodedLocation::new(description.to_string(), -22.57, 17.08),
            congestion_level: CongestionLevel::Clear,
            estimated_delay_minutes: 0,
            normal_travel_minutes: 6,
            traffic_travel_minutes: 6,
            route_summary: RouteSummary {
                distance_km: 4.2,
                duration_minutes: 6.0,
                duration_in_traffic_minutes: 6.0,
                polyline: Some("abc".to_string()),
            },
            source: "test".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_returned() {
        let cache = MemoryCache::new(Duration::from_secs(180));
        let stored = status("Windhoek");
        cache.set("windhoek", stored.clone()).await.unwrap();

        tokio::time::advance(Duration::from_secs(179)).await;
        let cached = cache.get("windhoek").await.unwrap();
        assert_eq!(cached, Some(stored));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_dropped() {
        let cache = MemoryCache::new(Duration::from_secs(180));
        cache.set("windhoek", status("Windhoek")).await.unwrap();

        tokio::time::advance(Duration::from_secs(180)).await;
        assert!(cache.get("windhoek").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_key_returns_none() {
        let cache = MemoryCache::default();
        assert!(cache.get("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::default();
        cache.set("b1", status("first")).await.unwrap();
        cache.set("b1", status("second")).await.unwrap();

        let cached = cache.get("b1").await.unwrap().unwrap();
        assert_eq!(cached.location.description, "second");
        assert_eq!(cache.len().await, 1);
    }
}
