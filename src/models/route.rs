//! Route geometry and travel time summary

use serde::{Deserialize, Serialize};

use super::GeocodedLocation;

/// Degrees added/subtracted around a location to span a short probe route (~2.2 km)
pub const PROBE_OFFSET_DEGREES: f64 = 0.02;

/// A bare latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Clamp into the valid latitude/longitude range
    #[must_use]
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        }
    }

    /// `lat,lng` as providers expect it in query strings
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Diagonal route through a location used to sample live traffic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRoute {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

impl ProbeRoute {
    /// Build the NW to SE probe crossing the location
    #[must_use]
    pub fn around(location: &GeocodedLocation) -> Self {
        Self {
            origin: Coordinates::clamped(
                location.latitude + PROBE_OFFSET_DEGREES,
                location.longitude - PROBE_OFFSET_DEGREES,
            ),
            destination: Coordinates::clamped(
                location.latitude - PROBE_OFFSET_DEGREES,
                location.longitude + PROBE_OFFSET_DEGREES,
            ),
        }
    }
}

/// Travel time estimates for the probe route, in minutes and kilometers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_km: f64,
    /// Free-flow duration
    pub duration_minutes: f64,
    /// Duration under live traffic
    pub duration_in_traffic_minutes: f64,
    /// Encoded overview polyline; opaque
    pub polyline: Option<String>,
}

impl RouteSummary {
    /// Live minus free-flow duration, in seconds, never negative
    #[must_use]
    pub fn delay_seconds(&self) -> f64 {
        ((self.duration_in_traffic_minutes - self.duration_minutes) * 60.0).max(0.0)
    }

    #[must_use]
    pub fn baseline_seconds(&self) -> f64 {
        self.duration_minutes * 60.0
    }
}
