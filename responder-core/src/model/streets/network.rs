//! Road graph with a spatial index for snapping coordinates to nodes

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Directed,
    graph::{DiGraph, EdgeIndex, Edges, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};

use super::{RoadEdge, RoadNode};
use crate::{Coordinate, Meters};

/// Node position stored in the R-tree, see [`Coordinate::to_cartesian`]
pub type IndexedPoint = GeomWithData<[f64; 3], NodeIndex>;

/// Immutable road network shared by all queries
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
    node_lookup: HashMap<String, NodeIndex>,
}

impl RoadGraph {
    /// Wraps a built graph and indexes its nodes
    pub fn new(graph: DiGraph<RoadNode, RoadEdge>) -> Self {
        let points = graph
            .node_indices()
            .map(|idx| {
                let coordinate = Coordinate::from(graph[idx].geometry);
                IndexedPoint::new(coordinate.to_cartesian(), idx)
            })
            .collect();
        let node_lookup = graph
            .node_indices()
            .map(|idx| (graph[idx].id.clone(), idx))
            .collect();

        Self {
            graph,
            rtree: RTree::bulk_load(points),
            node_lookup,
        }
    }

    /// Nearest graph node to the coordinate, if one lies within `max_distance`
    ///
    /// Returns the node together with its great circle distance in meters.
    pub fn nearest_node(
        &self,
        coordinate: &Coordinate,
        max_distance: Meters,
    ) -> Option<(NodeIndex, Meters)> {
        let nearest = self.rtree.nearest_neighbor(&coordinate.to_cartesian())?;
        let node = nearest.data;
        let distance = coordinate.distance_to(&self.node_coordinate(node));

        (distance <= max_distance).then_some((node, distance))
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    pub fn node_coordinate(&self, node: NodeIndex) -> Coordinate {
        Coordinate::from(self.graph[node].geometry)
    }

    pub fn node_point(&self, node: NodeIndex) -> Point<f64> {
        self.graph[node].geometry
    }

    pub fn edges(&self, node: NodeIndex) -> Edges<'_, RoadEdge, Directed> {
        self.graph.edges(node)
    }

    pub fn edge(&self, edge: EdgeIndex) -> &RoadEdge {
        &self.graph[edge]
    }

    /// Source and target of an edge
    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, lat: f64, lon: f64) -> RoadNode {
        RoadNode {
            id: id.into(),
            geometry: Point::new(lon, lat),
        }
    }

    fn small_graph() -> RoadGraph {
        let mut graph = DiGraph::new();
        let a = graph.add_node(node("a", 40.7128, -74.0060));
        let b = graph.add_node(node("b", 40.7200, -74.0060));
        graph.add_edge(
            a,
            b,
            RoadEdge {
                id: "ab".into(),
                name: Some("Main St".into()),
                length: 800.0,
                base_time: 60.0,
                traffic_slot: 0,
            },
        );
        RoadGraph::new(graph)
    }

    #[test]
    fn snaps_to_closest_node() {
        let graph = small_graph();
        let near_b = Coordinate::new(40.7199, -74.0061).unwrap();
        let (node, distance) = graph.nearest_node(&near_b, 100.0).unwrap();
        assert_eq!(graph.graph[node].id, "b");
        assert!(distance < 20.0);
    }

    #[test]
    fn refuses_snaps_beyond_max_distance() {
        let graph = small_graph();
        let far = Coordinate::new(41.0, -74.0).unwrap();
        assert!(graph.nearest_node(&far, 1000.0).is_none());
    }

    #[test]
    fn snaps_by_ground_distance_at_high_latitude() {
        // at 60N a degree of longitude is half as long as a degree of latitude
        let mut graph = DiGraph::new();
        graph.add_node(node("east", 60.0, 10.005));
        graph.add_node(node("north", 60.003, 10.0));
        let graph = RoadGraph::new(graph);

        let origin = Coordinate::new(60.0, 10.0).unwrap();
        let (node, distance) = graph.nearest_node(&origin, 300.0).unwrap();
        assert_eq!(graph.graph[node].id, "east");
        assert!((270.0..290.0).contains(&distance));
    }

    #[test]
    fn looks_up_nodes_by_id() {
        let graph = small_graph();
        assert!(graph.node_by_id("a").is_some());
        assert!(graph.node_by_id("missing").is_none());
        assert_eq!(graph.edge_count(), 1);
    }
}
