//! Weighted undirected graph over the station catalog.
//!
//! Edge weight is the mean AQI of the two endpoint stations, so the sum of
//! weights along a path approximates the pollution a rider passes through.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::RouteError;
use crate::network::catalog::StationCatalog;
use crate::network::spatial::FALLBACK_AQI;
use crate::network::types::{RouteSegment, Station, StationId};

/// Station nodes in catalog order plus a dense adjacency list.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    nodes: IndexMap<StationId, Station>,
    adjacency: Vec<IndexMap<usize, f64>>,
}

/// An undirected edge with its endpoints in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: StationId,
    pub b: StationId,
    pub weight: f64,
}

impl NetworkGraph {
    /// Every catalog station as an isolated node.
    pub fn from_catalog(catalog: &StationCatalog) -> Self {
        let nodes: IndexMap<StationId, Station> = catalog
            .iter()
            .map(|s| (s.id.clone(), s.clone()))
            .collect();
        let adjacency = vec![IndexMap::new(); nodes.len()];
        Self { nodes, adjacency }
    }

    /// Builds the graph from an annotated catalog and raw route segments.
    ///
    /// Segments whose endpoint names do not resolve are dropped. A pair seen
    /// again overwrites the earlier weight.
    pub fn build(catalog: &StationCatalog, segments: &[RouteSegment]) -> Self {
        let mut graph = Self::from_catalog(catalog);
        let mut dropped = 0usize;

        for segment in segments {
            let resolved = catalog
                .find_by_name_substring(&segment.origin_name)
                .and_then(|o| {
                    catalog
                        .find_by_name_substring(&segment.destination_name)
                        .map(|d| (o, d))
                });

            let (origin, destination) = match resolved {
                Ok(pair) => pair,
                Err(e) => {
                    dropped += 1;
                    debug!(
                        origin = %segment.origin_name,
                        destination = %segment.destination_name,
                        error = %e,
                        "Dropping route segment"
                    );
                    continue;
                }
            };

            let weight = mean_aqi(&graph.nodes[origin], &graph.nodes[destination]);
            if let Err(e) = graph.set_edge(origin, destination, weight) {
                debug!(error = %e, "Dropping route segment");
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            segments = segments.len(),
            dropped,
            "Network graph built"
        );
        graph
    }

    /// Inserts or overwrites the undirected edge between `a` and `b`.
    /// Self-loops are ignored.
    pub fn set_edge(&mut self, a: &StationId, b: &StationId, weight: f64) -> Result<(), RouteError> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        if ia == ib {
            return Ok(());
        }
        self.adjacency[ia].insert(ib, weight);
        self.adjacency[ib].insert(ia, weight);
        Ok(())
    }

    fn require(&self, id: &StationId) -> Result<usize, RouteError> {
        self.index_of(id)
            .ok_or_else(|| RouteError::UnknownStation(id.to_string()))
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.nodes.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(IndexMap::len).sum::<usize>() / 2
    }

    pub fn weight(&self, a: &StationId, b: &StationId) -> Option<f64> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        self.adjacency[ia].get(&ib).copied()
    }

    /// All edges, each listed once.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (i, neighbors) in self.adjacency.iter().enumerate() {
            for (&j, &weight) in neighbors.iter().filter(|(j, _)| **j > i) {
                let (a, b) = (self.id_at(i).clone(), self.id_at(j).clone());
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                edges.push(Edge { a, b, weight });
            }
        }
        edges
    }

    pub(crate) fn index_of(&self, id: &StationId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub(crate) fn id_at(&self, index: usize) -> &StationId {
        &self.nodes[index].id
    }

    pub(crate) fn station_at(&self, index: usize) -> &Station {
        &self.nodes[index]
    }

    pub(crate) fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[index].iter().map(|(&j, &w)| (j, w))
    }
}

fn mean_aqi(a: &Station, b: &Station) -> f64 {
    let a = a.aqi.unwrap_or(FALLBACK_AQI) as f64;
    let b = b.aqi.unwrap_or(FALLBACK_AQI) as f64;
    (a + b) / 2.0
}
