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

/// Dijkstra's algorithm from `start` towards a set of target nodes.
///
/// The search stops as soon as every target is settled (or the graph is
/// exhausted). An empty target list explores everything reachable.
/// Returns the label of every settled node.
pub(crate) fn dijkstra_path_weights<F>(
    graph: &RoadGraph,
    start: NodeIndex,
    targets: &[NodeIndex],
    guard: &QueryGuard<'_>,
    mut weight: F,
) -> Result<HashMap<NodeIndex, Label>, Error>
where
    F: FnMut(EdgeIndex, &RoadEdge) -> Cost,
{
    let node_count = graph.node_count();
    let mut labels: HashMap<NodeIndex, Label> = HashMap::new();
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    let mut pending = FixedBitSet::with_capacity(node_count);
    for target in targets {
        pending.insert(target.index());
    }
    let mut remaining = pending.count_ones(..);

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

    while let Some(State { cost, node }) = heap.pop() {
        if settled.contains(node.index()) {
            continue;
        }
        guard.check()?;
        settled.insert(node.index());

        if pending.contains(node.index()) {
            pending.set(node.index(), false);
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        let Some(&current) = labels.get(&node) else {
            continue;
        };
        debug_assert_eq!(current.cost, cost);

        // Examine neighbors
        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let candidate = Label {
                cost: cost.saturating_add(weight(edge.id(), edge.weight())),
                distance: current.distance + edge.weight().length,
            };

            match labels.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(candidate);
                    heap.push(State {
                        cost: candidate.cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if candidate.improves_on(entry.get()) {
                        *entry.get_mut() = candidate;
                        heap.push(State {
                            cost: candidate.cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    labels.retain(|node, _| settled.contains(node.index()));
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        loading::MapData,
        routing::{CancelFlag, guard::QueryGuard},
    };
    use std::time::Duration;

    fn line_graph() -> RoadGraph {
        // a -> b -> c, plus an expensive shortcut a -> c and an isolated d
        let data: MapData = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "a", "lat": 0.0, "lon": 0.0},
                    {"id": "b", "lat": 0.0, "lon": 0.001},
                    {"id": "c", "lat": 0.0, "lon": 0.002},
                    {"id": "d", "lat": 1.0, "lon": 1.0}
                ],
                "edges": [
                    {"id": "ab", "from": "a", "to": "b", "length_m": 100.0, "base_time_s": 10.0},
                    {"id": "bc", "from": "b", "to": "c", "length_m": 100.0, "base_time_s": 10.0},
                    {"id": "ac", "from": "a", "to": "c", "length_m": 150.0, "base_time_s": 30.0}
                ]
            }"#,
        )
        .unwrap();
        data.build(40.0).unwrap().0
    }

    #[test]
    fn finds_cheapest_costs_and_their_distances() {
        let graph = line_graph();
        let flag = CancelFlag::new();
        let guard = QueryGuard::new(&flag, Duration::from_secs(5));
        let a = graph.node_by_id("a").unwrap();
        let c = graph.node_by_id("c").unwrap();
        let d = graph.node_by_id("d").unwrap();

        let labels =
            dijkstra_path_weights(&graph, a, &[c, d], &guard, |_, e| e.cost(1.0, 1.0)).unwrap();

        let to_c = labels[&c];
        assert_eq!(to_c.cost, 20_000);
        assert_eq!(to_c.distance, 200.0);
        assert!(!labels.contains_key(&d));
    }

    #[test]
    fn weights_change_the_winner() {
        let graph = line_graph();
        let flag = CancelFlag::new();
        let guard = QueryGuard::new(&flag, Duration::from_secs(5));
        let a = graph.node_by_id("a").unwrap();
        let c = graph.node_by_id("c").unwrap();

        let labels = dijkstra_path_weights(&graph, a, &[c], &guard, |_, e| {
            let multiplier = if e.id == "bc" { 4.0 } else { 1.0 };
            e.cost(multiplier, 1.0)
        })
        .unwrap();

        assert_eq!(labels[&c].cost, 30_000);
        assert_eq!(labels[&c].distance, 150.0);
    }

    #[test]
    fn cancelled_search_stops() {
        let graph = line_graph();
        let flag = CancelFlag::new();
        flag.cancel();
        let guard = QueryGuard::new(&flag, Duration::from_secs(5));
        let a = graph.node_by_id("a").unwrap();

        let result = dijkstra_path_weights(&graph, a, &[], &guard, |_, e| e.cost(1.0, 1.0));
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
