use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::state::{Label, State};
use crate::{
    Cost, Error,
    model::{RoadEdge, RoadGraph},
    routing::guard::QueryGuard,
};

/// A path found by [`dijkstra_path`], as the ordered list of traversed edges
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TracedPath {
    pub(crate) cost: Cost,
    pub(crate) distance: f64,
    pub(crate) edges: Vec<EdgeIndex>,
}

/// Dijkstra's algorithm for the cheapest path between two nodes
///
/// Returns `Ok(None)` when `target` cannot be reached from `start`.
pub(crate) fn dijkstra_path<F>(
    graph: &RoadGraph,
    start: NodeIndex,
    target: NodeIndex,
    guard: &QueryGuard<'_>,
    mut weight: F,
) -> Result<Option<TracedPath>, Error>
where
    F: FnMut(EdgeIndex, &RoadEdge) -> Cost,
{
    let estimated_nodes = graph.node_count().min(1000);
    let mut labels: HashMap<NodeIndex, Label> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, EdgeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    labels.insert(
        start,
        Label {
            cost: 0,
            distance: 0.0,
        },
    );
    heap.push(State {
        cost: 0,
        node: start,
    });

    let mut reached = false;
    while let Some(State { node, .. }) = heap.pop() {
        if settled.contains(node.index()) {
            continue;
        }
        guard.check()?;
        settled.insert(node.index());

        // Check if we've reached the target
        if node == target {
            reached = true;
            break;
        }

        let Some(&current) = labels.get(&node) else {
            continue;
        };

        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let candidate = Label {
                cost: current
                    .cost
                    .saturating_add(weight(edge.id(), edge.weight())),
                distance: current.distance + edge.weight().length,
            };

            let improved = match labels.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(candidate);
                    true
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if candidate.improves_on(entry.get()) {
                        *entry.get_mut() = candidate;
                        true
                    } else {
                        false
                    }
                }
            };

            if improved {
                predecessors.insert(next, edge.id());
                heap.push(State {
                    cost: candidate.cost,
                    node: next,
                });
            }
        }
    }

    if !reached {
        return Ok(None);
    }

    // Follow predecessors backward from target to start
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let Some(&edge) = predecessors.get(&current) else {
            return Ok(None);
        };
        edges.push(edge);
        current = match graph.endpoints(edge) {
            Some((source, _)) => source,
            None => return Ok(None),
        };
    }
    edges.reverse(); // Now path is from start to target

    let label = labels[&target];
    Ok(Some(TracedPath {
        cost: label.cost,
        distance: label.distance,
        edges,
    }))
}
