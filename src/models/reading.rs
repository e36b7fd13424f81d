//! Pollutant readings returned by the air-quality service

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tracked pollutant species
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    /// All tracked pollutants in display order
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Human-facing pollutant code, also the output field identifier
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
        }
    }

    /// Key used under `iaqi` in the feed response
    #[must_use]
    pub fn feed_key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Reverse lookup of [`Pollutant::feed_key`]
    #[must_use]
    pub fn from_feed_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.feed_key() == key)
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Latest readings for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AirQualityReading {
    /// City or station label supplied by the service
    pub city: String,
    /// Individual index per pollutant; absent pollutants have no entry
    pub values: BTreeMap<Pollutant, f64>,
    /// Overall index, when the station reports one
    pub aqi: Option<f64>,
    /// Observation time reported by the station
    pub observed_at: Option<DateTime<FixedOffset>>,
}

impl AirQualityReading {
    /// Create a reading with no pollutant values
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper for setting one pollutant value
    #[must_use]
    pub fn with_value(mut self, pollutant: Pollutant, value: f64) -> Self {
        self.values.insert(pollutant, value);
        self
    }

    /// Value for `pollutant`, `None` when the service did not report it
    #[must_use]
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values.get(&pollutant).copied()
    }

    /// Field text for `pollutant`: the value as-is, or empty when absent
    #[must_use]
    pub fn field_text(&self, pollutant: Pollutant) -> String {
        self.value(pollutant)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}
