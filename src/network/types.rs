//! Core data types shared by the catalog, the spatial join and the planner.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Opaque station identifier assigned by the upstream transit feed.
///
/// Backed by `Arc<str>` so graph nodes and path results can clone it freely.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(Arc<str>);

impl StationId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StationId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A transit station. `aqi` is filled in once by the spatial join.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub aqi: Option<u32>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            aqi: None,
        }
    }
}

/// A pollution monitoring site and its latest AQI value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AqiReading {
    pub lat: f64,
    pub lon: f64,
    pub aqi: u32,
    pub name: String,
}

/// Connectivity between two stations, identified by display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteSegment {
    pub origin_name: String,
    pub destination_name: String,
}

impl RouteSegment {
    pub fn new(origin_name: impl Into<String>, destination_name: impl Into<String>) -> Self {
        Self {
            origin_name: origin_name.into(),
            destination_name: destination_name.into(),
        }
    }
}

/// Exact-coordinate map key.
///
/// Compares the bit patterns of both components, with `-0.0` folded into
/// `0.0` so the two zeroes address the same reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoordKey(u64, u64);

impl CoordKey {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self(canonical_bits(lat), canonical_bits(lon))
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

/// A least-polluted path, start to end inclusive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathResult {
    pub stations: Vec<Station>,
    /// Sum of the edge weights along the path.
    pub total_weight: f64,
}

impl PathResult {
    pub fn start(&self) -> Option<&Station> {
        self.stations.first()
    }

    pub fn end(&self) -> Option<&Station> {
        self.stations.last()
    }

    pub fn hops(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.id.as_str()).collect()
    }
}
