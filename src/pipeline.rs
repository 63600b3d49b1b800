//! Ingestion pipeline: catalog and index load, spatial join, graph build.
//!
//! The stages run strictly in that order. Only the feed fetches overlap.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::network::records::{AqiRecord, RouteRecord, StationRecord, route_segments};
use crate::network::spatial::{PredictionOverrides, annotate};
use crate::network::{AirQualityIndex, Network, NetworkGraph, StationCatalog};
use crate::services::feed_source::FeedSource;

/// Builds an immutable [`Network`] from raw feed records.
#[tracing::instrument(skip_all, fields(
    stations = station_records.len(),
    readings = aqi_records.len(),
    routes = route_records.len(),
))]
pub fn build_network(
    station_records: Vec<StationRecord>,
    aqi_records: Vec<AqiRecord>,
    route_records: &[RouteRecord],
    overrides: &PredictionOverrides,
) -> Network {
    let mut catalog = StationCatalog::load(station_records);
    let index = AirQualityIndex::load(aqi_records);
    annotate(&mut catalog, &index, overrides);

    let segments = route_segments(route_records);
    let graph = NetworkGraph::build(&catalog, &segments);

    Network::new(catalog, graph)
}

/// Annotated catalog only, for exporting per-station AQI without routes.
pub fn annotate_stations(
    station_records: Vec<StationRecord>,
    aqi_records: Vec<AqiRecord>,
    overrides: &PredictionOverrides,
) -> StationCatalog {
    let mut catalog = StationCatalog::load(station_records);
    let index = AirQualityIndex::load(aqi_records);
    annotate(&mut catalog, &index, overrides);
    catalog
}

/// Fetches all three feeds concurrently, then builds the network.
#[tracing::instrument(skip_all)]
pub async fn ingest<S: FeedSource + ?Sized>(
    source: &S,
    overrides: &PredictionOverrides,
) -> Result<Network> {
    let (stations, readings, routes) =
        tokio::join!(source.stations(), source.air_quality(), source.routes());

    let stations = stations.context("station feed unavailable")?;
    let readings = readings.context("air quality feed unavailable")?;
    let routes = routes.context("route feed unavailable")?;

    info!(
        stations = stations.len(),
        readings = readings.len(),
        routes = routes.len(),
        "Feeds fetched"
    );

    Ok(build_network(stations, readings, &routes, overrides))
}

/// Fetches stations and readings concurrently and annotates the catalog.
#[tracing::instrument(skip_all)]
pub async fn ingest_stations<S: FeedSource + ?Sized>(
    source: &S,
    overrides: &PredictionOverrides,
) -> Result<StationCatalog> {
    let (stations, readings) = tokio::join!(source.stations(), source.air_quality());
    let stations = stations.context("station feed unavailable")?;
    let readings = readings.context("air quality feed unavailable")?;
    Ok(annotate_stations(stations, readings, overrides))
}

/// Like [`ingest_stations`], but an unavailable air-quality feed only
/// degrades the annotation to the fallback value. For name lookups.
#[tracing::instrument(skip_all)]
pub async fn lookup_stations<S: FeedSource + ?Sized>(
    source: &S,
    overrides: &PredictionOverrides,
) -> Result<StationCatalog> {
    let (stations, readings) = tokio::join!(source.stations(), source.air_quality());
    let stations = stations.context("station feed unavailable")?;
    let readings = readings.unwrap_or_else(|e| {
        warn!(error = %e, "Air quality feed unavailable, using an empty index");
        Vec::new()
    });
    Ok(annotate_stations(stations, readings, overrides))
}
