//! Trait for the upstream feeds the routing core is built from.

use anyhow::Result;

use crate::network::records::{AqiRecord, RouteRecord, StationRecord};

/// Delivers typed records from the station, route and air-quality feeds.
///
/// Implementations own transport and decoding; a record that cannot be
/// decoded is dropped there, not surfaced as an error.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// All stations of the transit mode, in feed order.
    async fn stations(&self) -> Result<Vec<StationRecord>>;

    /// Line routes with their origin/destination sections.
    async fn routes(&self) -> Result<Vec<RouteRecord>>;

    /// Current readings from monitoring sites around the city.
    async fn air_quality(&self) -> Result<Vec<AqiRecord>>;
}
