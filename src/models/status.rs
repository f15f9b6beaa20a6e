//! Traffic status response, the unit stored in the cache

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeocodedLocation, RouteSummary, TrafficQuery};

/// Discrete traffic severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionLevel {
    Clear,
    Moderate,
    Heavy,
}

impl CongestionLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CongestionLevel::Clear => "Clear",
            CongestionLevel::Moderate => "Moderate",
            CongestionLevel::Heavy => "Heavy",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficStatusResponse {
    pub query: TrafficQuery,
    pub location: GeocodedLocation,
    pub congestion_level: CongestionLevel,
    pub estimated_delay_minutes: u32,
    pub normal_travel_minutes: u32,
    pub traffic_travel_minutes: u32,
    pub route_summary: RouteSummary,
    /// Provenance tag of the provider that produced the data
    pub source: String,
    pub updated_at: DateTime<Utc>,
}
