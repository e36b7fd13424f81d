//! `aqi-locator` - live air-quality readings for the current location
//!
//! This library resolves the device position, queries the WAQI
//! "feed by geographic point" endpoint and writes the readings into a fixed
//! set of named output fields in one batch.

pub mod category;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod logging;
pub mod models;
pub mod sink;
pub mod waqi;
pub mod widget;

// Re-export core types for public API
pub use category::AqiCategory;
pub use config::AqiConfig;
pub use error::AqiError;
pub use geolocation::{FixedPosition, GeolocationProvider, IpLookup, Unsupported};
pub use models::{AirQualityReading, Coordinates, FieldBatch, OutputField, Pollutant};
pub use sink::{ConsoleSink, MemorySink, OutputSink};
pub use waqi::{AirQualitySource, WaqiClient};
pub use widget::{LocationAirQualityWidget, RefreshOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AqiError>;
