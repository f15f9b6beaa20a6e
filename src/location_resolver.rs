//! Location Resolution Module
//!
//! This module turns a traffic query into a single geocoded location using
//! whatever geocoding provider is plugged in.

use async_trait::async_trait;
use tracing::debug;

use crate::TrafficError;
use crate::models::{GeocodedLocation, QueryType, TrafficQuery};

/// One geocoding match as reported by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub formatted_address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub place_id: Option<String>,
}

/// Forward geocoding provider
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up candidates for free text, best match first.
    ///
    /// An empty list means the provider found nothing; transport or provider
    /// failures are errors.
    async fn geocode(&self, text: &str) -> crate::Result<Vec<GeocodeCandidate>>;
}

/// Service for resolving queries to locations
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a query to its best-match location.
    ///
    /// The provider's first candidate is taken as authoritative.
    pub async fn resolve_location(
        geocoder: &dyn Geocoder,
        query: &TrafficQuery,
    ) -> crate::Result<GeocodedLocation> {
        debug!("Geocoding traffic query: {}", query.raw);

        let candidates = geocoder.geocode(&query.raw).await?;
        let Some(primary) = candidates.into_iter().next() else {
            return Err(TrafficError::location_not_found(query.raw.trim()));
        };

        let address = primary
            .formatted_address
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| query.raw.trim().to_string());
        let description = match query.query_type {
            QueryType::Road => format!("{address} (road focus)"),
            QueryType::Area => address,
        };

        let location = GeocodedLocation::new(description, primary.latitude, primary.longitude)
            .with_place_id(primary.place_id);

        debug!(
            "Resolved location: {} at ({})",
            location.description,
            location.format_coordinates()
        );

        Ok(location)
    }
}
