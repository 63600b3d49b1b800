//! Raw feed records, as delivered by the feed layer.
//!
//! Every field is optional so one bad record never fails a whole feed;
//! validation happens when a record is converted into a core type.

use serde::Deserialize;
use serde_json::Value;

use crate::error::RouteError;
use crate::network::types::{AqiReading, RouteSegment, Station};

/// One entry of the TfL `StopPoint/Mode/{mode}` feed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub id: Option<String>,
    pub common_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl StationRecord {
    pub fn new(id: &str, common_name: &str, lat: f64, lon: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            common_name: Some(common_name.to_string()),
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Validates the record. A missing display name falls back to the id.
    pub fn into_station(self) -> Result<Station, RouteError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| RouteError::malformed("station", "missing id"))?;
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(RouteError::malformed(
                "station",
                format!("'{id}' is missing coordinates"),
            ));
        };
        if !lat.is_finite() || !lon.is_finite() {
            return Err(RouteError::malformed(
                "station",
                format!("'{id}' has non-finite coordinates"),
            ));
        }
        let name = self.common_name.unwrap_or_else(|| id.clone());
        Ok(Station::new(id, name, lat, lon))
    }
}

/// One line route of the TfL `Line/Mode/{mode}/Route` feed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub line_id: Option<String>,
    pub route_sections: Option<Vec<RouteSectionRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSectionRecord {
    pub origination_name: Option<String>,
    pub destination_name: Option<String>,
}

impl RouteRecord {
    pub fn new(line_id: &str, sections: &[(&str, &str)]) -> Self {
        Self {
            line_id: Some(line_id.to_string()),
            route_sections: Some(
                sections
                    .iter()
                    .map(|(o, d)| RouteSectionRecord {
                        origination_name: Some(o.to_string()),
                        destination_name: Some(d.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    /// Segments with both endpoint names present. Records without a line id
    /// carry no usable connectivity and yield nothing.
    pub fn segments(&self) -> impl Iterator<Item = RouteSegment> + '_ {
        let sections: &[RouteSectionRecord] = match (&self.line_id, &self.route_sections) {
            (Some(_), Some(sections)) => sections.as_slice(),
            _ => &[],
        };
        sections.iter().filter_map(|section| {
            match (&section.origination_name, &section.destination_name) {
                (Some(o), Some(d)) => Some(RouteSegment::new(o.as_str(), d.as_str())),
                _ => None,
            }
        })
    }
}

/// Flattens route records into segments, preserving feed order.
pub fn route_segments(routes: &[RouteRecord]) -> Vec<RouteSegment> {
    routes.iter().flat_map(RouteRecord::segments).collect()
}

/// One result of the WAQI `search` endpoint.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AqiRecord {
    /// Either an integer or a string; WAQI reports `"-"` for offline sites.
    pub aqi: Option<Value>,
    pub station: Option<AqiSiteRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AqiSiteRecord {
    pub name: Option<String>,
    pub geo: Option<Vec<f64>>,
}

impl AqiRecord {
    pub fn new(name: &str, lat: f64, lon: f64, aqi: Value) -> Self {
        Self {
            aqi: Some(aqi),
            station: Some(AqiSiteRecord {
                name: Some(name.to_string()),
                geo: Some(vec![lat, lon]),
            }),
        }
    }

    pub fn into_reading(self) -> Result<AqiReading, RouteError> {
        let site = self
            .station
            .ok_or_else(|| RouteError::malformed("aqi", "missing station"))?;
        let name = site.name.unwrap_or_else(|| "Unknown".to_string());
        let (lat, lon) = match site.geo.as_deref() {
            Some([lat, lon, ..]) if lat.is_finite() && lon.is_finite() => (*lat, *lon),
            _ => {
                return Err(RouteError::malformed(
                    "aqi",
                    format!("'{name}' has no usable geo"),
                ));
            }
        };
        let aqi = self
            .aqi
            .as_ref()
            .and_then(parse_aqi)
            .ok_or_else(|| {
                RouteError::malformed("aqi", format!("'{name}' has a non-integer aqi"))
            })?;
        Ok(AqiReading {
            lat,
            lon,
            aqi,
            name,
        })
    }
}

/// Accepts a non-negative integer or a string made only of ASCII digits.
fn parse_aqi(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}
