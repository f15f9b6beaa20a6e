//! Integration tests for `TrafficService` with in-process collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ra_traffic::models::ProbeRoute;
use ra_traffic::{
    CongestionLevel, DirectionsLeg, DirectionsProvider, GeocodeCandidate, Geocoder, MemoryCache,
    QueryType, TrafficCache, TrafficError, TrafficService, TrafficStatusRequest,
    TrafficStatusResponse, build_advisory,
};

struct CountingGeocoder {
    candidates: Vec<GeocodeCandidate>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingGeocoder {
    fn windhoek() -> Self {
        Self {
            candidates: vec![GeocodeCandidate {
                formatted_address: Some("Windhoek".to_string()),
                latitude: -22.57,
                longitude: 17.08,
                place_id: Some("windhoek-place".to_string()),
            }],
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn geocode(&self, _text: &str) -> ra_traffic::Result<Vec<GeocodeCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TrafficError::upstream("connection refused"));
        }
        Ok(self.candidates.clone())
    }
}

struct CountingDirections {
    leg: DirectionsLeg,
    calls: AtomicUsize,
}

impl CountingDirections {
    fn new(duration: f64, in_traffic: f64, distance: f64) -> Self {
        Self {
            leg: DirectionsLeg {
                duration_seconds: Some(duration),
                duration_in_traffic_seconds: Some(in_traffic),
                distance_meters: Some(distance),
                polyline: Some("encoded".to_string()),
            },
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for CountingDirections {
    fn source(&self) -> &str {
        "google_maps"
    }

    async fn directions(&self, _route: &ProbeRoute) -> ra_traffic::Result<DirectionsLeg> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.leg.clone())
    }
}

/// Memory cache that counts writes
#[derive(Default)]
struct RecordingCache {
    inner: MemoryCache,
    writes: AtomicUsize,
}

impl RecordingCache {
    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrafficCache for RecordingCache {
    async fn get(&self, key: &str) -> ra_traffic::Result<Option<TrafficStatusResponse>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: TrafficStatusResponse) -> ra_traffic::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }
}

struct BrokenCache;

#[async_trait]
impl TrafficCache for BrokenCache {
    async fn get(&self, _key: &str) -> ra_traffic::Result<Option<TrafficStatusResponse>> {
        Err(TrafficError::cache("disk unavailable"))
    }

    async fn set(&self, _key: &str, _value: TrafficStatusResponse) -> ra_traffic::Result<()> {
        Err(TrafficError::cache("disk unavailable"))
    }
}

struct Fixture {
    geocoder: Arc<CountingGeocoder>,
    directions: Arc<CountingDirections>,
    cache: Arc<RecordingCache>,
    service: TrafficService,
}

fn fixture(api_key: Option<&str>, geocoder: CountingGeocoder, directions: CountingDirections) -> Fixture {
    let geocoder = Arc::new(geocoder);
    let directions = Arc::new(directions);
    let cache = Arc::new(RecordingCache::default());
    let service = TrafficService::new(api_key, geocoder.clone(), directions.clone(), cache.clone());
    Fixture {
        geocoder,
        directions,
        cache,
        service,
    }
}

#[tokio::test]
async fn miss_resolves_classifies_and_caches() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let status = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .expect("miss path should resolve");

    assert_eq!(status.congestion_level, CongestionLevel::Heavy);
    assert_eq!(status.estimated_delay_minutes, 5);
    assert_eq!(status.normal_travel_minutes, 10);
    assert_eq!(status.traffic_travel_minutes, 15);
    assert_eq!(status.route_summary.distance_km, 4.0);
    assert_eq!(status.route_summary.polyline.as_deref(), Some("encoded"));
    assert_eq!(status.location.description, "Windhoek");
    assert_eq!(status.location.latitude, -22.57);
    assert_eq!(status.query.normalized, "windhoek");
    assert_eq!(status.query.query_type, QueryType::Area);
    assert_eq!(status.source, "google_maps");

    assert_eq!(f.geocoder.calls(), 1);
    assert_eq!(f.directions.calls(), 1);
    assert_eq!(f.cache.writes(), 1);
    assert_eq!(f.cache.get("windhoek").await.unwrap(), Some(status));
}

#[tokio::test]
async fn hit_short_circuits_collaborators() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let first = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap();
    let second = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("  WINDHOEK "))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(f.geocoder.calls(), 1);
    assert_eq!(f.directions.calls(), 1);
    assert_eq!(f.cache.writes(), 1);
}

#[tokio::test]
async fn missing_key_fails_before_any_upstream_call() {
    let f = fixture(
        None,
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let err = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap_err();

    assert!(matches!(err, TrafficError::Configuration { .. }));
    assert_eq!(err.code().as_str(), "TRAFFIC_CONFIG_MISSING");
    assert_eq!(f.geocoder.calls(), 0);
    assert_eq!(f.directions.calls(), 0);
    assert_eq!(f.cache.writes(), 0);
}

#[tokio::test]
async fn unknown_location_is_not_cached() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::empty(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let err = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Atlantis"))
        .await
        .unwrap_err();

    assert!(matches!(err, TrafficError::LocationNotFound { .. }));
    assert_eq!(err.code().as_str(), "TRAFFIC_DATA_UNAVAILABLE");
    assert_eq!(f.directions.calls(), 0);
    assert_eq!(f.cache.writes(), 0);
}

#[tokio::test]
async fn upstream_failure_propagates_unchanged() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::failing(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let err = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap_err();

    assert!(matches!(err, TrafficError::UpstreamUnavailable { .. }));
    assert_eq!(f.directions.calls(), 0);
    assert_eq!(f.cache.writes(), 0);
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 900.0, 4000.0),
    );

    let err = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, TrafficError::Validation { .. }));
    assert_eq!(f.geocoder.calls(), 0);
}

#[tokio::test]
async fn cache_failure_is_not_masked() {
    let geocoder = Arc::new(CountingGeocoder::windhoek());
    let service = TrafficService::new(
        Some("test-key"),
        geocoder.clone(),
        Arc::new(CountingDirections::new(600.0, 600.0, 4000.0)),
        Arc::new(BrokenCache),
    );

    let err = service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap_err();

    assert!(matches!(err, TrafficError::Cache { .. }));
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn free_flowing_route_reads_clear() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 540.0, 4000.0),
    );

    let status = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap();

    assert_eq!(status.congestion_level, CongestionLevel::Clear);
    assert_eq!(status.estimated_delay_minutes, 0);
    assert_eq!(status.traffic_travel_minutes, 9);

    let advisory = build_advisory(&status);
    assert!(advisory.contains("Roads Authority Namibia Advisory"));
    assert!(advisory.to_lowercase().contains("clear"));
}

#[tokio::test]
async fn explicit_type_is_cached_apart_from_inferred() {
    let f = fixture(
        Some("test-key"),
        CountingGeocoder::windhoek(),
        CountingDirections::new(600.0, 600.0, 4000.0),
    );

    let as_road = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek").with_type(QueryType::Road))
        .await
        .unwrap();
    let inferred = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek"))
        .await
        .unwrap();
    let as_area = f
        .service
        .get_traffic_status(&TrafficStatusRequest::new("Windhoek").with_type(QueryType::Area))
        .await
        .unwrap();

    assert_eq!(as_road.query.query_type, QueryType::Road);
    assert_eq!(as_road.location.description, "Windhoek (road focus)");
    assert_eq!(inferred.location.description, "Windhoek");
    assert_eq!(as_area, inferred);

    assert_eq!(f.geocoder.calls(), 2);
    assert_eq!(f.cache.writes(), 2);
    assert!(f.cache.get("windhoek").await.unwrap().is_some());
}
