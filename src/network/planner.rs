//! Least-polluted path search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::RouteError;
use crate::network::graph::NetworkGraph;
use crate::network::types::{PathResult, StationId};

/// Frontier entry ordered so the max-heap pops the lowest cost first.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    node: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Dijkstra from `start` to `end`, minimising the summed edge weight.
///
/// Returns `Ok(None)` when `end` is unreachable. Both ids must be graph
/// nodes, otherwise [`RouteError::UnknownStation`].
pub fn plan(
    graph: &NetworkGraph,
    start: &StationId,
    end: &StationId,
) -> Result<Option<PathResult>, RouteError> {
    let source = graph
        .index_of(start)
        .ok_or_else(|| RouteError::UnknownStation(start.to_string()))?;
    let target = graph
        .index_of(end)
        .ok_or_else(|| RouteError::UnknownStation(end.to_string()))?;

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    heap.push(QueueEntry {
        cost: 0.0,
        node: source,
    });

    while let Some(QueueEntry { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if node == target {
            break;
        }

        for (next, weight) in graph.neighbors(node) {
            if settled[next] {
                continue;
            }
            let candidate = cost + weight;
            if candidate < dist[next] {
                dist[next] = candidate;
                prev[next] = Some(node);
                heap.push(QueueEntry {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    if !settled[target] {
        debug!(%start, %end, "No path between stations");
        return Ok(None);
    }

    let mut order = vec![target];
    let mut cursor = target;
    while let Some(p) = prev[cursor] {
        order.push(p);
        cursor = p;
    }
    order.reverse();

    let stations = order
        .into_iter()
        .map(|i| graph.station_at(i).clone())
        .collect();

    Ok(Some(PathResult {
        stations,
        total_weight: dist[target],
    }))
}
