//! Output formatting and persistence for planned routes and station AQI.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::network::{PathResult, Station, StationCatalog};
use crate::stats::{RouteSummary, aqi_category};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a route summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &RouteSummary) {
    debug!("{:#?}", summary);
}

/// Logs a route summary as pretty-printed JSON.
pub fn print_json(summary: &RouteSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// One line per station: `Name (AQI: n)`.
pub fn format_path(path: &PathResult) -> String {
    path.stations
        .iter()
        .map(|s| match s.aqi {
            Some(aqi) => format!("{} (AQI: {aqi})", s.name),
            None => format!("{} (AQI: n/a)", s.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends a [`RouteSummary`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &RouteSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[derive(Serialize)]
struct StationAnnotation<'a> {
    id: &'a str,
    name: &'a str,
    lat: f64,
    lon: f64,
    aqi: Option<u32>,
    category: Option<&'static str>,
}

impl<'a> From<&'a Station> for StationAnnotation<'a> {
    fn from(s: &'a Station) -> Self {
        Self {
            id: s.id.as_str(),
            name: &s.name,
            lat: s.lat,
            lon: s.lon,
            aqi: s.aqi,
            category: s.aqi.map(aqi_category),
        }
    }
}

/// Writes every station with its AQI, for map markers. Overwrites `path`.
pub fn write_annotations(path: &str, catalog: &StationCatalog) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for station in catalog.iter() {
        writer.serialize(StationAnnotation::from(station))?;
    }
    writer.flush()?;

    info!(path, stations = catalog.len(), "Station annotations written");
    Ok(catalog.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::records::StationRecord;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let summary = RouteSummary::default();
        print_pretty(&summary);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = RouteSummary::default();
        print_json(&summary).unwrap();
    }

    #[test]
    fn test_format_path() {
        let mut a = Station::new("a", "Victoria", 0.0, 0.0);
        a.aqi = Some(42);
        let b = Station::new("b", "Green Park", 0.0, 0.0);
        let path = PathResult {
            stations: vec![a, b],
            total_weight: 71.0,
        };
        assert_eq!(format_path(&path), "Victoria (AQI: 42)\nGreen Park (AQI: n/a)");
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("clean_air_router_test_header.csv");
        let _ = fs::remove_file(&path);

        let summary = RouteSummary::from_error("not_found", "station not recognised");
        append_record(&path, &summary).unwrap();
        append_record(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_annotations() {
        let path = temp_path("clean_air_router_test_annotations.csv");
        let catalog = StationCatalog::load(vec![
            StationRecord::new("a", "Alpha", 51.5, -0.1),
            StationRecord::new("b", "Bravo", 51.6, -0.2),
        ]);

        let written = write_annotations(&path, &catalog).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "id,name,lat,lon,aqi,category");
        assert_eq!(lines[1], "a,Alpha,51.5,-0.1,,");

        fs::remove_file(&path).unwrap();
    }
}
