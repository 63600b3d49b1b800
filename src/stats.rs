use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::network::PathResult;

/// One planned query, flattened for CSV/JSON output.
#[derive(Debug, Default, Serialize)]
pub struct RouteSummary {
    pub timestamp: DateTime<Utc>,
    pub from_query: Option<String>,
    pub to_query: Option<String>,

    pub start_id: Option<String>,
    pub start_name: Option<String>,
    pub end_id: Option<String>,
    pub end_name: Option<String>,

    // path metrics
    pub stations: usize,
    pub hops: usize,
    pub total_weight: f64,
    pub mean_aqi: f64,
    pub max_aqi: u32,
    pub category: Option<String>,
    pub route: String,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl RouteSummary {
    pub fn from_path(path: &PathResult) -> Self {
        let aqis: Vec<f64> = path
            .stations
            .iter()
            .filter_map(|s| s.aqi)
            .map(f64::from)
            .collect();
        let mean_aqi = mean(&aqis);

        RouteSummary {
            timestamp: Utc::now(),
            start_id: path.start().map(|s| s.id.to_string()),
            start_name: path.start().map(|s| s.name.clone()),
            end_id: path.end().map(|s| s.id.to_string()),
            end_name: path.end().map(|s| s.name.clone()),
            stations: path.stations.len(),
            hops: path.hops(),
            total_weight: path.total_weight,
            mean_aqi,
            max_aqi: path.stations.iter().filter_map(|s| s.aqi).max().unwrap_or(0),
            category: (!aqis.is_empty()).then(|| aqi_category(mean_aqi.round() as u32).to_string()),
            route: path
                .stations
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" > "),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        RouteSummary {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set the station names as the user typed them
    pub fn with_queries(mut self, from: &str, to: &str) -> Self {
        self.from_query = Some(from.to_string());
        self.to_query = Some(to.to_string());
        self
    }
}

/// Arithmetic mean. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// US EPA band for an AQI value.
///
/// | Range    | Category                       |
/// |----------|--------------------------------|
/// | 0–50     | Good                           |
/// | 51–100   | Moderate                       |
/// | 101–150  | Unhealthy for Sensitive Groups |
/// | 151–200  | Unhealthy                      |
/// | 201–300  | Very Unhealthy                 |
/// | > 300    | Hazardous                      |
pub fn aqi_category(aqi: u32) -> &'static str {
    match aqi {
        0..=50 => "Good",
        51..=100 => "Moderate",
        101..=150 => "Unhealthy for Sensitive Groups",
        151..=200 => "Unhealthy",
        201..=300 => "Very Unhealthy",
        _ => "Hazardous",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Station;

    fn station(id: &str, aqi: Option<u32>) -> Station {
        Station {
            aqi,
            ..Station::new(id, format!("{id} Station"), 0.0, 0.0)
        }
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[10.0, 90.0, 20.0]), 40.0);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(aqi_category(0), "Good");
        assert_eq!(aqi_category(50), "Good");
        assert_eq!(aqi_category(51), "Moderate");
        assert_eq!(aqi_category(100), "Moderate");
        assert_eq!(aqi_category(101), "Unhealthy for Sensitive Groups");
        assert_eq!(aqi_category(150), "Unhealthy for Sensitive Groups");
        assert_eq!(aqi_category(151), "Unhealthy");
        assert_eq!(aqi_category(200), "Unhealthy");
        assert_eq!(aqi_category(201), "Very Unhealthy");
        assert_eq!(aqi_category(300), "Very Unhealthy");
        assert_eq!(aqi_category(301), "Hazardous");
    }

    #[test]
    fn test_from_path() {
        let path = PathResult {
            stations: vec![
                station("a", Some(10)),
                station("b", Some(90)),
                station("c", Some(20)),
            ],
            total_weight: 105.0,
        };
        let summary = RouteSummary::from_path(&path).with_queries("a", "c");

        assert_eq!(summary.stations, 3);
        assert_eq!(summary.hops, 2);
        assert_eq!(summary.mean_aqi, 40.0);
        assert_eq!(summary.max_aqi, 90);
        assert_eq!(summary.category.as_deref(), Some("Good"));
        assert_eq!(summary.start_id.as_deref(), Some("a"));
        assert_eq!(summary.end_name.as_deref(), Some("c Station"));
        assert_eq!(summary.route, "a Station > b Station > c Station");
        assert_eq!(summary.from_query.as_deref(), Some("a"));
        assert!(summary.error_type.is_none());
    }

    #[test]
    fn test_from_error() {
        let summary = RouteSummary::from_error("no_path", "no route").with_queries("x", "y");
        assert_eq!(summary.error_type.as_deref(), Some("no_path"));
        assert_eq!(summary.stations, 0);
        assert!(summary.category.is_none());
    }
}
