//! Geocoded location model

use serde::{Deserialize, Serialize};

/// Best-match location for a traffic query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    /// Display string (formatted address or the query itself)
    pub description: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Provider place identifier, passed through untouched
    pub place_id: Option<String>,
}

impl GeocodedLocation {
    /// Create a new location
    #[must_use]
    pub fn new(description: String, latitude: f64, longitude: f64) -> Self {
        Self {
            description,
            latitude,
            longitude,
            place_id: None,
        }
    }

    /// Attach the provider place id, if the provider reported one
    #[must_use]
    pub fn with_place_id(mut self, place_id: Option<String>) -> Self {
        self.place_id = place_id;
        self
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
