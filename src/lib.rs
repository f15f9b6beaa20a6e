//! `ra-traffic` - Traffic advisories for the Roads Authority
//!
//! This library resolves a free-text road or area query into live traffic
//! conditions: it geocodes the query, times a short probe route with and
//! without traffic, classifies the congestion and phrases an official
//! advisory, caching results per normalized query.

pub mod advisory;
pub mod api;
pub mod cache;
pub mod config;
pub mod congestion;
pub mod error;
pub mod google_maps;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod routing;
pub mod service;
pub mod web;

// Re-export core types for public API
pub use advisory::build_advisory;
pub use cache::{MemoryCache, PersistentCache, TrafficCache};
pub use config::TrafficConfig;
pub use congestion::classify;
pub use error::{ErrorCode, TrafficError};
pub use google_maps::GoogleMapsClient;
pub use location_resolver::{GeocodeCandidate, Geocoder, LocationResolver};
pub use models::{
    CongestionLevel, GeocodedLocation, QueryType, RouteSummary, TrafficQuery,
    TrafficStatusRequest, TrafficStatusResponse,
};
pub use routing::{DirectionsLeg, DirectionsProvider, RouteResolver};
pub use service::TrafficService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TrafficError>;
