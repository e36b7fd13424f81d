//! Named output slots and the batch written into them

use super::{AirQualityReading, Coordinates, Pollutant};
use serde::{Deserialize, Serialize};

/// One write-only output slot
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputField {
    Pollutant(Pollutant),
    Latitude,
    Longitude,
    City,
}

impl OutputField {
    /// Every slot in the order a batch lists them
    pub const ALL: [OutputField; 9] = [
        OutputField::Pollutant(Pollutant::Pm25),
        OutputField::Pollutant(Pollutant::Pm10),
        OutputField::Pollutant(Pollutant::O3),
        OutputField::Pollutant(Pollutant::No2),
        OutputField::Pollutant(Pollutant::So2),
        OutputField::Pollutant(Pollutant::Co),
        OutputField::Latitude,
        OutputField::Longitude,
        OutputField::City,
    ];

    /// Fixed identifier the slot is addressed by
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            OutputField::Pollutant(p) => p.code(),
            OutputField::Latitude => "latitude",
            OutputField::Longitude => "longitude",
            OutputField::City => "city",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

impl std::fmt::Display for OutputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Values for all nine slots from one successful lookup.
///
/// A batch is always complete: there is no way to build one that leaves a
/// slot out, so writing it never mixes old and new values.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldBatch {
    entries: Vec<(OutputField, String)>,
}

impl FieldBatch {
    /// Format a reading for the given coordinates
    #[must_use]
    pub fn from_reading(coordinates: &Coordinates, reading: &AirQualityReading) -> Self {
        let entries = OutputField::ALL
            .into_iter()
            .map(|field| {
                let value = match field {
                    OutputField::Pollutant(p) => reading.field_text(p),
                    OutputField::Latitude => coordinates.latitude_field(),
                    OutputField::Longitude => coordinates.longitude_field(),
                    OutputField::City => reading.city.clone(),
                };
                (field, value)
            })
            .collect();
        Self { entries }
    }

    /// Value written into `field`
    #[must_use]
    pub fn get(&self, field: OutputField) -> &str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputField, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn san_francisco() -> FieldBatch {
        let coords = Coordinates::new(37.7749, -122.4194);
        let reading = AirQualityReading::new("San Francisco")
            .with_value(Pollutant::Pm25, 42.0)
            .with_value(Pollutant::O3, 18.0);
        FieldBatch::from_reading(&coords, &reading)
    }

    #[test]
    fn test_batch_covers_every_field() {
        let batch = san_francisco();
        assert_eq!(batch.len(), 9);
        let ids: Vec<_> = batch.iter().map(|(f, _)| f.id()).collect();
        assert_eq!(
            ids,
            ["PM2.5", "PM10", "O3", "NO2", "SO2", "CO", "latitude", "longitude", "city"]
        );
    }

    #[test]
    fn test_batch_values() {
        let batch = san_francisco();
        assert_eq!(batch.get(OutputField::City), "San Francisco");
        assert_eq!(batch.get(OutputField::Pollutant(Pollutant::Pm25)), "42");
        assert_eq!(batch.get(OutputField::Pollutant(Pollutant::O3)), "18");
        assert_eq!(batch.get(OutputField::Pollutant(Pollutant::Pm10)), "");
        assert_eq!(batch.get(OutputField::Pollutant(Pollutant::Co)), "");
        assert_eq!(batch.get(OutputField::Latitude), "37.774900");
        assert_eq!(batch.get(OutputField::Longitude), "-122.419400");
    }

    #[test]
    fn test_field_id_lookup() {
        assert_eq!(
            OutputField::from_id("PM2.5"),
            Some(OutputField::Pollutant(Pollutant::Pm25))
        );
        assert_eq!(OutputField::from_id("city"), Some(OutputField::City));
        assert_eq!(OutputField::from_id("pm25"), None);
    }
}
