//! Configuration management for `Aurora Tonight`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AuroraError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Aurora Tonight` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    /// External feed endpoints and credentials
    pub feeds: FeedsConfig,
    /// HTTP client behavior
    pub http: HttpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Web server configuration
    pub server: ServerConfig,
    /// Default application settings
    pub defaults: DefaultsConfig,
}

/// Feed endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// NOAA ovation aurora grid
    pub aurora_url: String,
    /// NOAA SWPC base URL for Kp and solar wind products
    pub space_weather_url: String,
    /// OpenWeatherMap base URL (forecast and geocoding)
    pub openweathermap_url: String,
    /// OpenWeatherMap API key
    pub openweathermap_api_key: Option<String>,
    /// OpenTopoData base URL
    pub elevation_url: String,
    /// OpenTopoData dataset name
    pub elevation_dataset: String,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 = single attempt)
    pub max_retries: u32,
    /// Upper bound for a single elevation lookup in seconds
    pub lookup_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request timeout in seconds
    pub request_timeout_seconds: u32,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Location used when the caller gives no coordinates
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    /// Number of nearby places considered as viewing candidates
    pub nearby_places: usize,
}

// Default value functions
fn default_aurora_url() -> String {
    "https://services.swpc.noaa.gov/json/ovation_aurora_latest.json".to_string()
}

fn default_space_weather_url() -> String {
    "https://services.swpc.noaa.gov".to_string()
}

fn default_openweathermap_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_elevation_url() -> String {
    "https://api.opentopodata.org".to_string()
}

fn default_elevation_dataset() -> String {
    "aster30m".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_lookup_timeout() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    30
}

fn default_location_name() -> String {
    "Fairbanks, Alaska".to_string()
}

fn default_nearby_places() -> usize {
    20
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            aurora_url: default_aurora_url(),
            space_weather_url: default_space_weather_url(),
            openweathermap_url: default_openweathermap_url(),
            openweathermap_api_key: None,
            elevation_url: default_elevation_url(),
            elevation_dataset: default_elevation_dataset(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: 0,
            lookup_timeout_seconds: default_lookup_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            latitude: 64.8378,
            longitude: -147.7164,
            location_name: default_location_name(),
            nearby_places: default_nearby_places(),
        }
    }
}

impl AuroraConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

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

        // AURORA_FEEDS__OPENWEATHERMAP_API_KEY=... overrides feeds.openweathermap_api_key
        builder = builder.add_source(
            Environment::with_prefix("AURORA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AuroraConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aurora-tonight").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.feeds.aurora_url.is_empty() {
            self.feeds.aurora_url = default_aurora_url();
        }
        if self.feeds.space_weather_url.is_empty() {
            self.feeds.space_weather_url = default_space_weather_url();
        }
        if self.feeds.openweathermap_url.is_empty() {
            self.feeds.openweathermap_url = default_openweathermap_url();
        }
        if self.feeds.elevation_url.is_empty() {
            self.feeds.elevation_url = default_elevation_url();
        }
        if self.feeds.elevation_dataset.is_empty() {
            self.feeds.elevation_dataset = default_elevation_dataset();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_timeout();
        }
        if self.http.lookup_timeout_seconds == 0 {
            self.http.lookup_timeout_seconds = default_lookup_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.defaults.location_name.is_empty() {
            self.defaults.location_name = default_location_name();
        }
        if self.defaults.nearby_places == 0 {
            self.defaults.nearby_places = default_nearby_places();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.feeds.openweathermap_api_key {
            if api_key.trim().is_empty() {
                return Err(AuroraError::config(
                    "OpenWeatherMap API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(AuroraError::config(
                    "OpenWeatherMap API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 120 {
            return Err(AuroraError::config("HTTP timeout cannot exceed 120 seconds").into());
        }

        if self.http.lookup_timeout_seconds > 120 {
            return Err(
                AuroraError::config("Elevation lookup timeout cannot exceed 120 seconds").into(),
            );
        }

        if self.http.max_retries > 5 {
            return Err(AuroraError::config("HTTP max retries cannot exceed 5").into());
        }

        if self.defaults.nearby_places > 50 {
            return Err(AuroraError::config("Nearby places cannot exceed 50").into());
        }

        if !(-90.0..=90.0).contains(&self.defaults.latitude) {
            return Err(
                AuroraError::config("Default latitude must be between -90 and 90").into(),
            );
        }

        if !(-180.0..=180.0).contains(&self.defaults.longitude) {
            return Err(
                AuroraError::config("Default longitude must be between -180 and 180").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AuroraError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AuroraError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("aurora_url", &self.feeds.aurora_url),
            ("space_weather_url", &self.feeds.space_weather_url),
            ("openweathermap_url", &self.feeds.openweathermap_url),
            ("elevation_url", &self.feeds.elevation_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AuroraError::config(format!(
                    "Feed URL '{name}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
