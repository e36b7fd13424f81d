//! Configuration management for the air-quality lookup
//!
//! Handles loading configuration from files and environment variables,
//! and validates every setting before a client is built from it.

use crate::AqiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix, e.g. `AQI_LOCATOR_SERVICE__TOKEN`
pub const ENV_PREFIX: &str = "AQI_LOCATOR";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AqiConfig {
    /// Air-quality service settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Where coordinates come from
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Air-quality service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the WAQI API
    #[serde(default = "default_service_base_url")]
    pub base_url: String,
    /// Access token; never compiled in
    pub token: Option<String>,
    /// Request timeout in seconds, 0 leaves the platform default in place
    #[serde(default = "default_service_timeout")]
    pub timeout_seconds: u32,
}

/// Geolocation provider selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// One of `fixed`, `ip` or `none`
    #[serde(default = "default_geolocation_provider")]
    pub provider: String,
    /// Latitude used by the `fixed` provider
    pub latitude: Option<f64>,
    /// Longitude used by the `fixed` provider
    pub longitude: Option<f64>,
    /// Endpoint used by the `ip` provider
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_service_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_service_timeout() -> u32 {
    30
}

fn default_geolocation_provider() -> String {
    "fixed".to_string()
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_base_url(),
            token: None,
            timeout_seconds: default_service_timeout(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider: default_geolocation_provider(),
            latitude: None,
            longitude: None,
            ip_lookup_url: default_ip_lookup_url(),
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

impl AqiConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_environment(config_path, Self::environment())
    }

    /// `AQI_LOCATOR_*` overrides. Values stay strings until deserialised
    /// so an all-digit token keeps its exact text.
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn load_with_environment(config_path: Option<PathBuf>, environment: Environment) -> Result<Self> {
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

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AqiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aqi-locator").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.service.base_url.is_empty() {
            self.service.base_url = default_service_base_url();
        }
        if self.geolocation.provider.is_empty() {
            self.geolocation.provider = default_geolocation_provider();
        }
        if self.geolocation.ip_lookup_url.is_empty() {
            self.geolocation.ip_lookup_url = default_ip_lookup_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        // Trailing slashes would double up when the feed path is appended.
        while self.service.base_url.ends_with('/') {
            self.service.base_url.pop();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_token()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the service token when one is configured
    pub fn validate_token(&self) -> Result<()> {
        if let Some(token) = &self.service.token {
            if token.is_empty() {
                return Err(AqiError::config(
                    "Service token cannot be empty if provided. Either remove it or provide a valid token.",
                )
                .into());
            }

            if token.chars().any(char::is_whitespace) {
                return Err(AqiError::config(
                    "Service token must not contain whitespace. Please check your token.",
                )
                .into());
            }

            if token.len() > 100 {
                return Err(AqiError::config(
                    "Service token appears to be invalid (too long). Please check your token.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.service.timeout_seconds > 300 {
            return Err(AqiError::config("Service timeout cannot exceed 300 seconds").into());
        }

        if let Some(latitude) = self.geolocation.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(AqiError::config(format!(
                    "Latitude {latitude} is out of range (-90..=90)"
                ))
                .into());
            }
        }

        if let Some(longitude) = self.geolocation.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(AqiError::config(format!(
                    "Longitude {longitude} is out of range (-180..=180)"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AqiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AqiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_providers = ["fixed", "ip", "none"];
        if !valid_providers.contains(&self.geolocation.provider.as_str()) {
            return Err(AqiError::config(format!(
                "Invalid geolocation provider '{}'. Must be one of: {}",
                self.geolocation.provider,
                valid_providers.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Service base URL", &self.service.base_url),
            ("IP lookup URL", &self.geolocation.ip_lookup_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(
                    AqiError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
                );
            }
        }

        Ok(())
    }
}
