//! The routing core: station catalog, air-quality index, spatial join,
//! graph construction and least-polluted path search.

pub mod air_quality;
pub mod catalog;
pub mod graph;
pub mod planner;
pub mod records;
pub mod snapshot;
pub mod spatial;
pub mod types;

pub use air_quality::AirQualityIndex;
pub use catalog::StationCatalog;
pub use graph::{Edge, NetworkGraph};
pub use records::{AqiRecord, RouteRecord, StationRecord, route_segments};
pub use snapshot::{Network, NetworkStore};
pub use spatial::{FALLBACK_AQI, PredictionOverrides};
pub use types::{AqiReading, PathResult, RouteSegment, Station, StationId};
