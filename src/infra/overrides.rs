//! Loads forecast AQI values that replace live readings.
//!
//! The forecasting model runs elsewhere and drops its output as CSV:
//!
//! ```text
//! lat,lon,aqi,timestamp
//! 51.522883,-0.15713,64,2026-10-18T09:00:00Z
//! 51.5067,-0.1428,48,
//! ```
//!
//! `timestamp` is optional. With a query time, dated rows later than that
//! time are ignored and the latest remaining row per coordinate wins.
//! Undated rows always apply and reset the timestamp seen for their
//! coordinate, so any dated row after them competes afresh.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::{info, warn};

use crate::network::spatial::PredictionOverrides;
use crate::network::types::CoordKey;

#[derive(Debug, Deserialize)]
struct PredictionRow {
    lat: f64,
    lon: f64,
    aqi: u32,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

pub fn load_overrides(path: &str, at: Option<DateTime<Utc>>) -> Result<PredictionOverrides> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open prediction file {path}"))?;
    let overrides = read_overrides(file, at)?;
    info!(path, predictions = overrides.len(), "Prediction overrides loaded");
    Ok(overrides)
}

pub fn read_overrides<R: Read>(reader: R, at: Option<DateTime<Utc>>) -> Result<PredictionOverrides> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut overrides = PredictionOverrides::new();
    let mut newest: HashMap<CoordKey, DateTime<Utc>> = HashMap::new();

    for (line, result) in rdr.deserialize::<PredictionRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(row = line + 1, error = %e, "Skipping prediction row");
                continue;
            }
        };

        let key = CoordKey::new(row.lat, row.lon);
        match (at, row.timestamp) {
            (Some(at), Some(ts)) => {
                if ts > at || newest.get(&key).is_some_and(|seen| *seen > ts) {
                    continue;
                }
                newest.insert(key, ts);
            }
            (_, None) => {
                newest.remove(&key);
            }
            (None, Some(_)) => {}
        }

        overrides.insert(row.lat, row.lon, row.aqi);
    }

    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CSV: &str = "lat,lon,aqi,timestamp
51.5,-0.1,40,2026-10-18T08:00:00Z
51.5,-0.1,55,2026-10-18T10:00:00Z
51.5,-0.1,70,2026-10-18T09:00:00Z
51.6,-0.2,33,
51.7,-0.3,not-a-number,
";

    #[test]
    fn test_latest_prediction_not_after_query_time() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let overrides = read_overrides(CSV.as_bytes(), Some(at)).unwrap();

        assert_eq!(overrides.get(51.5, -0.1), Some(70));
        assert_eq!(overrides.get(51.6, -0.2), Some(33));
        assert_eq!(overrides.get(51.7, -0.3), None);
    }

    #[test]
    fn test_without_query_time_last_row_wins() {
        let overrides = read_overrides(CSV.as_bytes(), None).unwrap();
        assert_eq!(overrides.get(51.5, -0.1), Some(70));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_query_time_before_all_predictions() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 7, 0, 0).unwrap();
        let overrides = read_overrides(CSV.as_bytes(), Some(at)).unwrap();
        assert_eq!(overrides.get(51.5, -0.1), None);
        assert_eq!(overrides.get(51.6, -0.2), Some(33));
    }

    #[test]
    fn test_undated_row_resets_dated_precedence() {
        let csv = "lat,lon,aqi,timestamp
51.5,-0.1,50,2026-10-18T10:00:00Z
51.5,-0.1,60,
51.5,-0.1,70,2026-10-18T09:00:00Z
";
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 11, 0, 0).unwrap();
        let overrides = read_overrides(csv.as_bytes(), Some(at)).unwrap();
        assert_eq!(overrides.get(51.5, -0.1), Some(70));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_overrides("/nonexistent/predictions.csv", None).is_err());
    }
}
