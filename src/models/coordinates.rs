//! Coordinates produced by a geolocation capability

use serde::{Deserialize, Serialize};

/// Device position in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude as written into the output field, exactly six decimals
    #[must_use]
    pub fn latitude_field(&self) -> String {
        fixed6(self.latitude)
    }

    /// Longitude as written into the output field, exactly six decimals
    #[must_use]
    pub fn longitude_field(&self) -> String {
        fixed6(self.longitude)
    }

    /// `geo:{lat};{lon}` path segment understood by the feed endpoint.
    /// Full precision, shortest round-trip formatting.
    #[must_use]
    pub fn geo_segment(&self) -> String {
        format!("geo:{};{}", self.latitude, self.longitude)
    }

    /// True when both values lie inside the valid degree ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Six-decimal rendering where an exact tie rounds away from zero and
/// negative zero prints unsigned. `{:.6}` alone rounds ties to even.
fn fixed6(value: f64) -> String {
    // -0.0 compares equal to 0.0, so it takes no sign here.
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // A tie is exactly k / 10^7 with k ending in 5. Being a binary fraction,
    // that value is (k / 5^7) / 2^7, which f64 holds exactly.
    let seventh = format!("{magnitude:.7}");
    if let Ok(k) = seventh.replace('.', "").parse::<u64>() {
        if k % 10 == 5 && k % 78_125 == 0 && (k / 78_125) as f64 / 128.0 == magnitude {
            let micros = k / 10 + 1;
            return format!("{sign}{}.{:06}", micros / 1_000_000, micros % 1_000_000);
        }
    }

    format!("{sign}{magnitude:.6}")
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
