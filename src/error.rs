//! Error types and handling for the traffic advisory service

use std::fmt;

use thiserror::Error;

/// Stable machine-readable codes surfaced to API consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Provider credential is not configured
    TrafficConfigMissing,
    /// The query could not be matched to a location
    TrafficDataUnavailable,
    /// The maps provider failed or could not be reached
    TrafficUpstreamError,
    /// The request itself was malformed
    ValidationInvalidInput,
    /// The cache backend failed
    TrafficCacheError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TrafficConfigMissing => "TRAFFIC_CONFIG_MISSING",
            ErrorCode::TrafficDataUnavailable => "TRAFFIC_DATA_UNAVAILABLE",
            ErrorCode::TrafficUpstreamError => "TRAFFIC_UPSTREAM_ERROR",
            ErrorCode::ValidationInvalidInput => "VALIDATION_INVALID_INPUT",
            ErrorCode::TrafficCacheError => "TRAFFIC_CACHE_ERROR",
        }
    }

    /// HTTP status the API layer answers with for this code
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::TrafficConfigMissing => 503,
            ErrorCode::TrafficDataUnavailable => 404,
            ErrorCode::TrafficUpstreamError => 502,
            ErrorCode::ValidationInvalidInput => 400,
            ErrorCode::TrafficCacheError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the traffic advisory pipeline
#[derive(Error, Debug)]
pub enum TrafficError {
    /// Required provider configuration is missing or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Geocoding returned no candidates for the query
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Network or provider-side failure
    #[error("Upstream provider error: {message}")]
    UpstreamUnavailable { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache backend errors
    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl TrafficError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            TrafficError::Configuration { .. } => ErrorCode::TrafficConfigMissing,
            TrafficError::LocationNotFound { .. } => ErrorCode::TrafficDataUnavailable,
            TrafficError::UpstreamUnavailable { .. } => ErrorCode::TrafficUpstreamError,
            TrafficError::Validation { .. } => ErrorCode::ValidationInvalidInput,
            TrafficError::Cache { .. } => ErrorCode::TrafficCacheError,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TrafficError::Configuration { .. } => {
                "Traffic data provider is not configured".to_string()
            }
            TrafficError::LocationNotFound { .. } => {
                "Unable to resolve location for traffic status".to_string()
            }
            TrafficError::UpstreamUnavailable { .. } => {
                "Unable to retrieve traffic conditions at this time".to_string()
            }
            TrafficError::Validation { message } => message.clone(),
            TrafficError::Cache { .. } => {
                "Traffic status storage is temporarily unavailable".to_string()
            }
        }
    }
}
