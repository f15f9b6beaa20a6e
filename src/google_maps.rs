//! Google Maps client for geocoding and live-traffic directions
//!
//! Implements [`Geocoder`] and [`DirectionsProvider`] over the Geocoding and
//! Directions JSON web services. Every call is bounded by the configured
//! request timeout and is attempted exactly once.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ProviderConfig;
use crate::location_resolver::{GeocodeCandidate, Geocoder};
use crate::models::ProbeRoute;
use crate::routing::{DirectionsLeg, DirectionsProvider};
use crate::TrafficError;

pub const SOURCE: &str = "google_maps";

/// HTTP client for the Google Maps web services
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    country: String,
    region: String,
}

impl GoogleMapsClient {
    /// Create a new client
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ra-traffic/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrafficError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config.country.clone(),
            region: config.region.clone(),
        })
    }

    fn api_key(&self) -> crate::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TrafficError::configuration("Maps provider API key is not set"))
    }

    #[instrument(skip(self, url))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        url: &str,
    ) -> crate::Result<T> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            let e = redact(e);
            error!("Request to {} failed: {}", endpoint, e);
            TrafficError::upstream(format!("{endpoint} request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{} returned HTTP {}", endpoint, status);
            return Err(TrafficError::upstream(format!(
                "{endpoint} returned HTTP {status}"
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            let e = redact(e);
            error!("Failed to parse {} response: {}", endpoint, e);
            TrafficError::upstream(format!("Invalid {endpoint} response: {e}"))
        })?;

        let elapsed = start_time.elapsed();
        debug!("{} answered in {:.3}s", endpoint, elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow {} response: {:.3}s", endpoint, elapsed.as_secs_f64());
        }

        Ok(body)
    }
}

/// Strip the request URL from a transport error; it carries the API key.
fn redact(error: reqwest::Error) -> reqwest::Error {
    error.without_url()
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, text: &str) -> crate::Result<Vec<GeocodeCandidate>> {
        let key = self.api_key()?;
        let url = format!(
            "{}/geocode/json?address={}&region={}&key={}",
            self.base_url,
            urlencoding::encode(&format!("{text}, {}", self.country)),
            urlencoding::encode(&self.region),
            urlencoding::encode(key)
        );

        let response: api::GeocodeResponse = self.get_json("geocode", &url).await?;
        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                warn!("No geocoding results for '{}'", text);
                return Ok(Vec::new());
            }
            other => {
                error!("Geocoding failed with status {}", other);
                return Err(TrafficError::upstream(format!(
                    "Geocoding failed with status {other}{}",
                    api::detail(response.error_message.as_deref())
                )));
            }
        }

        let candidates: Vec<GeocodeCandidate> = response
            .results
            .into_iter()
            .map(GeocodeCandidate::from)
            .collect();
        info!("Found {} geocoding results for '{}'", candidates.len(), text);
        Ok(candidates)
    }
}

#[async_trait]
impl DirectionsProvider for GoogleMapsClient {
    fn source(&self) -> &str {
        SOURCE
    }

    #[instrument(skip(self))]
    async fn directions(&self, route: &ProbeRoute) -> crate::Result<DirectionsLeg> {
        let key = self.api_key()?;
        let url = format!(
            "{}/directions/json?origin={}&destination={}&departure_time=now&traffic_model=best_guess&mode=driving&key={}",
            self.base_url,
            urlencoding::encode(&route.origin.to_query_value()),
            urlencoding::encode(&route.destination.to_query_value()),
            urlencoding::encode(key)
        );

        let response: api::DirectionsResponse = self.get_json("directions", &url).await?;
        if response.status != "OK" {
            error!("Directions failed with status {}", response.status);
            return Err(TrafficError::upstream(format!(
                "Directions failed with status {}{}",
                response.status,
                api::detail(response.error_message.as_deref())
            )));
        }

        // first route, first leg
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| TrafficError::upstream("Directions response contained no routes"))?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| TrafficError::upstream("Directions route contained no legs"))?;

        Ok(DirectionsLeg {
            duration_seconds: leg.duration.map(|d| d.value),
            duration_in_traffic_seconds: leg.duration_in_traffic.map(|d| d.value),
            distance_meters: leg.distance.map(|d| d.value),
            polyline: route.overview_polyline.map(|p| p.points),
        })
    }
}

/// Google Maps JSON response structures
mod api {
    use super::{Deserialize, GeocodeCandidate};

    pub fn detail(message: Option<&str>) -> String {
        message.map(|m| format!(": {m}")).unwrap_or_default()
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub status: String,
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub formatted_address: Option<String>,
        pub place_id: Option<String>,
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: LatLng,
    }

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }

    impl From<GeocodeResult> for GeocodeCandidate {
        fn from(result: GeocodeResult) -> Self {
            GeocodeCandidate {
                formatted_address: result.formatted_address,
                latitude: result.geometry.location.lat,
                longitude: result.geometry.location.lng,
                place_id: result.place_id,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct DirectionsResponse {
        pub status: String,
        #[serde(default)]
        pub routes: Vec<Route>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        #[serde(default)]
        pub legs: Vec<Leg>,
        pub overview_polyline: Option<Polyline>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Leg {
        pub duration: Option<ValueField>,
        pub duration_in_traffic: Option<ValueField>,
        pub distance: Option<ValueField>,
    }

    /// `{ "text": "10 mins", "value": 600 }`
    #[derive(Debug, Deserialize)]
    pub struct ValueField {
        pub value: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Polyline {
        pub points: String,
    }
}
