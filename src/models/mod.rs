//! Data models for the traffic advisory pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Query: Normalized user input and its inferred type
//! - Location: Geocoded position and display description
//! - Route: Probe route geometry and travel time summary
//! - Status: The cacheable traffic status response

pub mod location;
pub mod query;
pub mod route;
pub mod status;

// Re-export all public types for convenient access
pub use location::GeocodedLocation;
pub use query::{QueryType, TrafficQuery, TrafficStatusRequest};
pub use route::{Coordinates, ProbeRoute, RouteSummary};
pub use status::{CongestionLevel, TrafficStatusResponse};
