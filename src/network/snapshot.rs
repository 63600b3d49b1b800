//! Immutable network snapshots and the store that serves them.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::RouteError;
use crate::network::catalog::StationCatalog;
use crate::network::graph::NetworkGraph;
use crate::network::planner;
use crate::network::types::{PathResult, StationId};

/// An annotated catalog and the graph built from it.
///
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Network {
    catalog: StationCatalog,
    graph: NetworkGraph,
}

impl Network {
    pub fn new(catalog: StationCatalog, graph: NetworkGraph) -> Self {
        Self { catalog, graph }
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn plan(&self, start: &StationId, end: &StationId) -> Result<Option<PathResult>, RouteError> {
        planner::plan(&self.graph, start, end)
    }

    /// Resolves both names by substring and plans between them.
    ///
    /// A name that matches no station is [`RouteError::NotFound`], kept
    /// apart from an unreachable destination, which is `Ok(None)`.
    pub fn plan_by_name(&self, start: &str, end: &str) -> Result<Option<PathResult>, RouteError> {
        let start_id = self.catalog.find_by_name_substring(start)?;
        let end_id = self.catalog.find_by_name_substring(end)?;
        self.plan(start_id, end_id)
    }
}

/// Holds the current network snapshot.
///
/// Readers clone the `Arc` and query without holding the lock; a rebuild
/// swaps a new snapshot in while in-flight queries finish on the old one.
#[derive(Debug)]
pub struct NetworkStore {
    current: RwLock<Arc<Network>>,
}

impl NetworkStore {
    pub fn new(network: Network) -> Self {
        Self {
            current: RwLock::new(Arc::new(network)),
        }
    }

    pub fn snapshot(&self) -> Arc<Network> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `network` and returns the snapshot it replaced.
    pub fn replace(&self, network: Network) -> Arc<Network> {
        let next = Arc::new(network);
        info!(
            nodes = next.graph().node_count(),
            edges = next.graph().edge_count(),
            "Swapping network snapshot"
        );
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
