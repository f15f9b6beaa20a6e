//! Configuration management for the traffic advisory service
//!
//! Handles loading configuration from files, environment variables
//! (including the variable names used by existing deployments),
//! and provides validation for all configuration settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::TrafficError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Maps provider configuration
    pub provider: ProviderConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Maps provider (geocoding + directions) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider API key; required before any upstream call is made
    pub api_key: Option<String>,
    /// Base URL for the maps API
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Country appended to geocoding queries
    pub country: String,
    /// Region bias (ccTLD) for geocoding
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Persistent,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    pub ttl_seconds: u64,
    pub backend: CacheBackend,
    /// Cache directory location, used by the persistent backend
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector endpoint; traces are exported only when set
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

// Default value functions
fn default_provider_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_provider_timeout() -> u64 {
    8000
}

fn default_country() -> String {
    "Namibia".to_string()
}

fn default_region() -> String {
    "na".to_string()
}

fn default_cache_ttl() -> u64 {
    180
}

fn default_cache_location() -> String {
    "~/.cache/ra-traffic".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            timeout_ms: default_provider_timeout(),
            country: default_country(),
            region: default_region(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
            backend: CacheBackend::Memory,
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Cache directory with a leading `~` expanded to the home directory
    #[must_use]
    pub fn path(&self) -> PathBuf {
        match self.location.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.location)),
            None => PathBuf::from(&self.location),
        }
    }
}

impl TrafficConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. RA_TRAFFIC__CACHE__TTL_SECONDS=60
        builder = builder.add_source(
            Environment::with_prefix("RA_TRAFFIC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TrafficConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ra-traffic").join("config.toml"))
    }

    /// Apply the variable names used by existing deployments
    pub fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.provider.api_key.as_deref().is_none_or(str::is_empty) {
            self.provider.api_key =
                lookup("GOOGLE_MAPS_API_KEY").or_else(|| lookup("GEOCODING_API_KEY"));
        }
        if let Some(ttl) = lookup("TRAFFIC_CACHE_TTL_SECONDS").and_then(|v| v.parse().ok()) {
            self.cache.ttl_seconds = ttl;
        }
        if let Some(timeout) =
            lookup("TRAFFIC_DIRECTIONS_TIMEOUT_MS").and_then(|v| v.parse().ok())
        {
            self.provider.timeout_ms = timeout;
        }
        if self.logging.otlp_endpoint.is_none() {
            self.logging.otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self
            .provider
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.provider.api_key = None;
        }
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_provider_base_url();
        }
        if self.provider.timeout_ms == 0 {
            self.provider.timeout_ms = default_provider_timeout();
        }
        if self.provider.country.is_empty() {
            self.provider.country = default_country();
        }
        if self.provider.region.is_empty() {
            self.provider.region = default_region();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self
            .logging
            .otlp_endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.trim().is_empty())
        {
            self.logging.otlp_endpoint = None;
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_ms > 60_000 {
            return Err(
                TrafficError::configuration("Provider timeout cannot exceed 60000 ms").into(),
            );
        }

        if self.cache.ttl_seconds > 86_400 {
            return Err(TrafficError::configuration(
                "Cache TTL cannot exceed 86400 seconds (1 day)",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TrafficError::configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TrafficError::configuration(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(TrafficError::configuration(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(TrafficError::configuration(
                "OTLP endpoint must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
