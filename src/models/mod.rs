//! Data models for the air-quality lookup
//!
//! This module contains the request-scoped domain models:
//! - Coordinates: device position in decimal degrees
//! - Reading: pollutant values returned by the service
//! - Fields: named output slots and the batch written into them

pub mod coordinates;
pub mod fields;
pub mod reading;

pub use coordinates::Coordinates;
pub use fields::{FieldBatch, OutputField};
pub use reading::{AirQualityReading, Pollutant};
