//! Route timing around a geocoded location

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::TrafficError;
use crate::models::{GeocodedLocation, ProbeRoute, RouteSummary};

/// First leg of the first route a directions provider returned, in provider units
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsLeg {
    pub duration_seconds: Option<f64>,
    pub duration_in_traffic_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
    pub polyline: Option<String>,
}

/// Driving directions provider with live traffic
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Provenance tag recorded on every status built from this provider
    fn source(&self) -> &str;

    /// Fetch the first leg of the best route, departing now.
    async fn directions(&self, route: &ProbeRoute) -> crate::Result<DirectionsLeg>;
}

pub struct RouteResolver;

impl RouteResolver {
    /// Time a short probe route through `location` and convert to minutes/km.
    #[instrument(skip_all, fields(location = %location.description))]
    pub async fn resolve_route(
        provider: &dyn DirectionsProvider,
        location: &GeocodedLocation,
    ) -> crate::Result<RouteSummary> {
        let probe = ProbeRoute::around(location);
        debug!(
            "Probing route {} -> {}",
            probe.origin.to_query_value(),
            probe.destination.to_query_value()
        );

        let leg = provider.directions(&probe).await?;
        Self::summarize(leg)
    }

    fn summarize(leg: DirectionsLeg) -> crate::Result<RouteSummary> {
        let duration_seconds = leg
            .duration_seconds
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .ok_or_else(|| TrafficError::upstream("Missing travel time data"))?;
        // without live data the route is assumed to run at free-flow speed
        let traffic_seconds = leg
            .duration_in_traffic_seconds
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .unwrap_or(duration_seconds);
        let distance_meters = leg
            .distance_meters
            .filter(|meters| meters.is_finite() && *meters >= 0.0)
            .ok_or_else(|| TrafficError::upstream("Missing route distance"))?;

        Ok(RouteSummary {
            distance_km: distance_meters / 1000.0,
            duration_minutes: duration_seconds / 60.0,
            duration_in_traffic_minutes: traffic_seconds / 60.0,
            polyline: leg.polyline,
        })
    }
}
