//! Nearest-reading spatial join between stations and AQI monitoring sites.
//!
//! A linear scan over the index per station. City networks have a few
//! hundred stations against at most a few hundred monitoring sites.

use geo::{Distance, Geodesic, Point};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::network::air_quality::AirQualityIndex;
use crate::network::catalog::StationCatalog;
use crate::network::types::CoordKey;

/// AQI assumed when no reading is available ("moderate").
pub const FALLBACK_AQI: u32 = 100;

/// Ellipsoidal (WGS-84) distance between two coordinates, in kilometres.
pub fn geodesic_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    Geodesic.distance(Point::new(lon_a, lat_a), Point::new(lon_b, lat_b)) / 1000.0
}

/// AQI of the reading closest to `(lat, lon)`.
///
/// The first reading at the minimum distance wins; an empty index yields
/// [`FALLBACK_AQI`].
pub fn nearest(lat: f64, lon: f64, index: &AirQualityIndex) -> u32 {
    let mut best: Option<(f64, u32)> = None;

    for reading in index.iter() {
        let distance = geodesic_km(lat, lon, reading.lat, reading.lon);
        match best {
            Some((d, _)) if distance >= d => {}
            _ => best = Some((distance, reading.aqi)),
        }
    }

    best.map(|(_, aqi)| aqi).unwrap_or(FALLBACK_AQI)
}

/// Forecast AQI values that replace the nearest lookup for a station at
/// exactly the same coordinates.
#[derive(Debug, Clone, Default)]
pub struct PredictionOverrides {
    values: IndexMap<CoordKey, u32>,
}

impl PredictionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later values for the same coordinate replace earlier ones.
    pub fn insert(&mut self, lat: f64, lon: f64, aqi: u32) {
        self.values.insert(CoordKey::new(lat, lon), aqi);
    }

    pub fn get(&self, lat: f64, lon: f64) -> Option<u32> {
        self.values.get(&CoordKey::new(lat, lon)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Attaches an AQI value to every station in the catalog.
pub fn annotate(
    catalog: &mut StationCatalog,
    index: &AirQualityIndex,
    overrides: &PredictionOverrides,
) {
    if index.is_empty() {
        info!(fallback = FALLBACK_AQI, "No AQI readings, using fallback value");
    }

    let mut overridden = 0usize;
    for station in catalog.iter_mut() {
        let aqi = match overrides.get(station.lat, station.lon) {
            Some(predicted) => {
                overridden += 1;
                debug!(station = %station.id, predicted, "Using predicted AQI");
                predicted
            }
            None => nearest(station.lat, station.lon, index),
        };
        station.aqi = Some(aqi);
    }

    info!(
        stations = catalog.len(),
        readings = index.len(),
        overridden,
        "Spatial join complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::records::StationRecord;
    use crate::network::types::{AqiReading, StationId};

    fn reading(lat: f64, lon: f64, aqi: u32) -> AqiReading {
        AqiReading {
            lat,
            lon,
            aqi,
            name: format!("site {aqi}"),
        }
    }

    #[test]
    fn test_geodesic_km_known_distance() {
        // London to Paris is roughly 344 km.
        let d = geodesic_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 344.0).abs() < 5.0, "got {d}");
        assert!(geodesic_km(10.0, 10.0, 10.0, 10.0) < 1e-9);
    }

    #[test]
    fn test_nearest_empty_index_is_fallback() {
        let index = AirQualityIndex::default();
        assert_eq!(nearest(51.5, -0.1, &index), FALLBACK_AQI);
        assert_eq!(nearest(-33.9, 151.2, &index), 100);
    }

    #[test]
    fn test_nearest_picks_minimum_distance() {
        let index = AirQualityIndex::from_readings(vec![
            reading(51.60, -0.10, 10),
            reading(51.51, -0.12, 20),
            reading(51.40, -0.30, 30),
        ]);
        assert_eq!(nearest(51.50, -0.12, &index), 20);
    }

    #[test]
    fn test_nearest_no_reading_is_strictly_closer() {
        let index = AirQualityIndex::from_readings(vec![
            reading(51.45, -0.05, 11),
            reading(51.55, -0.20, 22),
            reading(51.52, -0.10, 33),
            reading(51.48, -0.15, 44),
        ]);

        for (lat, lon) in [(51.5, -0.1), (51.46, -0.06), (51.56, -0.21), (51.49, -0.16)] {
            let aqi = nearest(lat, lon, &index);
            let chosen = index.iter().find(|r| r.aqi == aqi).unwrap();
            let chosen_distance = geodesic_km(lat, lon, chosen.lat, chosen.lon);
            for other in index.iter() {
                assert!(geodesic_km(lat, lon, other.lat, other.lon) >= chosen_distance);
            }
        }
    }

    #[test]
    fn test_nearest_tie_keeps_first_reading() {
        let index = AirQualityIndex::from_readings(vec![
            reading(0.0, 1.0, 7),
            reading(0.0, -1.0, 8),
        ]);
        assert_eq!(nearest(0.0, 0.0, &index), 7);
    }

    #[test]
    fn test_annotate_applies_overrides() {
        let mut catalog = StationCatalog::load(vec![
            StationRecord::new("a", "Alpha", 0.0, 0.0),
            StationRecord::new("b", "Beta", 0.0, 2.0),
        ]);
        let index = AirQualityIndex::from_readings(vec![reading(0.0, 0.0, 10)]);
        let mut overrides = PredictionOverrides::new();
        overrides.insert(0.0, 2.0, 75);

        annotate(&mut catalog, &index, &overrides);

        assert_eq!(catalog.get(&StationId::new("a")).unwrap().aqi, Some(10));
        assert_eq!(catalog.get(&StationId::new("b")).unwrap().aqi, Some(75));
    }

    #[test]
    fn test_annotate_with_empty_index_uses_fallback() {
        let mut catalog = StationCatalog::load(vec![StationRecord::new("a", "Alpha", 0.0, 0.0)]);
        annotate(
            &mut catalog,
            &AirQualityIndex::default(),
            &PredictionOverrides::default(),
        );
        assert!(catalog.iter().all(|s| s.aqi == Some(FALLBACK_AQI)));
    }
}
