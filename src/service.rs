//! Traffic status orchestration: cache lookup, resolution on miss, cache fill

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::cache::{MemoryCache, PersistentCache, TrafficCache};
use crate::config::{CacheBackend, TrafficConfig};
use crate::congestion::classify;
use crate::google_maps::GoogleMapsClient;
use crate::location_resolver::{Geocoder, LocationResolver};
use crate::models::{TrafficQuery, TrafficStatusRequest, TrafficStatusResponse};
use crate::routing::{DirectionsProvider, RouteResolver};
use crate::TrafficError;

/// Resolves traffic status for free-text queries.
///
/// Built once at startup and shared; holds no state besides its collaborators.
pub struct TrafficService {
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn DirectionsProvider>,
    cache: Arc<dyn TrafficCache>,
    api_key_configured: bool,
}

impl TrafficService {
    pub fn new(
        api_key: Option<&str>,
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn DirectionsProvider>,
        cache: Arc<dyn TrafficCache>,
    ) -> Self {
        Self {
            geocoder,
            directions,
            cache,
            api_key_configured: api_key.is_some_and(|key| !key.trim().is_empty()),
        }
    }

    /// Wire the Google Maps client and the configured cache backend.
    pub fn from_config(config: &TrafficConfig) -> crate::Result<Self> {
        let maps = Arc::new(GoogleMapsClient::new(&config.provider)?);
        let cache: Arc<dyn TrafficCache> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryCache::new(config.cache.ttl())),
            CacheBackend::Persistent => Arc::new(PersistentCache::open(
                config.cache.path(),
                config.cache.ttl(),
            )?),
        };

        Ok(Self::new(
            config.provider.api_key.as_deref(),
            maps.clone(),
            maps,
            cache,
        ))
    }

    /// Current traffic status for a query, served from cache when fresh.
    #[instrument(skip(self), fields(query = %request.query))]
    pub async fn get_traffic_status(
        &self,
        request: &TrafficStatusRequest,
    ) -> crate::Result<TrafficStatusResponse> {
        let query = TrafficQuery::parse_with_type(&request.query, request.query_type)?;

        if let Some(cached) = self.cache.get(&query.cache_key()).await? {
            info!(
                query = %query.normalized,
                query_type = %query.query_type,
                "Serving traffic status from cache"
            );
            return Ok(cached);
        }

        self.ensure_api_key()?;

        let location = LocationResolver::resolve_location(self.geocoder.as_ref(), &query).await?;
        let route = RouteResolver::resolve_route(self.directions.as_ref(), &location).await?;

        let delay_seconds = route.delay_seconds();
        let congestion_level = classify(delay_seconds, route.baseline_seconds());
        debug!(
            "Classified {} as {} ({:.0}s delay)",
            query.normalized, congestion_level, delay_seconds
        );

        let response = TrafficStatusResponse {
            estimated_delay_minutes: whole_minutes(delay_seconds / 60.0),
            normal_travel_minutes: whole_minutes(route.duration_minutes),
            traffic_travel_minutes: whole_minutes(route.duration_in_traffic_minutes),
            congestion_level,
            source: self.directions.source().to_string(),
            updated_at: Utc::now(),
            route_summary: route,
            location,
            query,
        };

        self.cache
            .set(&response.query.cache_key(), response.clone())
            .await?;
        Ok(response)
    }

    fn ensure_api_key(&self) -> crate::Result<()> {
        if self.api_key_configured {
            Ok(())
        } else {
            Err(TrafficError::configuration(
                "Traffic data provider is not configured",
            ))
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes(minutes: f64) -> u32 {
    minutes.max(0.0).round() as u32
}
