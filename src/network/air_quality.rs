//! Air-quality monitoring sites keyed by exact coordinates.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::network::records::AqiRecord;
use crate::network::types::{AqiReading, CoordKey};

/// Readings keyed by `(lat, lon)`, enumerated in first-insertion order.
///
/// Two readings at identical coordinates collapse: the later value wins,
/// the key keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct AirQualityIndex {
    readings: IndexMap<CoordKey, AqiReading>,
}

impl AirQualityIndex {
    /// Builds the index from raw feed records, skipping records without a
    /// usable position or a non-negative integer AQI.
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AqiRecord>,
    {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for record in records {
            match record.into_reading() {
                Ok(reading) => index.insert(reading),
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "Skipping AQI record");
                }
            }
        }

        debug!(readings = index.len(), skipped, "Air quality index loaded");
        index
    }

    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = AqiReading>,
    {
        let mut index = Self::default();
        for reading in readings {
            index.insert(reading);
        }
        index
    }

    pub fn insert(&mut self, reading: AqiReading) {
        let key = CoordKey::new(reading.lat, reading.lon);
        if let Some(previous) = self.readings.insert(key, reading) {
            debug!(
                lat = previous.lat,
                lon = previous.lon,
                replaced = %previous.name,
                "Duplicate AQI coordinates, keeping latest reading"
            );
        }
    }

    pub fn get(&self, lat: f64, lon: f64) -> Option<&AqiReading> {
        self.readings.get(&CoordKey::new(lat, lon))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AqiReading> {
        self.readings.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_skips_unusable_records() {
        let index = AirQualityIndex::load(vec![
            AqiRecord::new("Marylebone Road", 51.52, -0.15, json!("35")),
            AqiRecord::new("Offline", 51.50, -0.12, json!("-")),
            AqiRecord::default(),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(51.52, -0.15).map(|r| r.aqi), Some(35));
    }

    #[test]
    fn test_empty_feed_gives_empty_index() {
        let index = AirQualityIndex::load(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn test_duplicate_coordinates_last_write_wins() {
        let index = AirQualityIndex::load(vec![
            AqiRecord::new("first", 1.0, 1.0, json!(10)),
            AqiRecord::new("other", 2.0, 2.0, json!(20)),
            AqiRecord::new("second", 1.0, 1.0, json!(99)),
        ]);

        assert_eq!(index.len(), 2);
        let reading = index.get(1.0, 1.0).unwrap();
        assert_eq!(reading.aqi, 99);
        assert_eq!(reading.name, "second");

        let order: Vec<_> = index.iter().map(|r| r.aqi).collect();
        assert_eq!(order, vec![99, 20]);
    }
}
