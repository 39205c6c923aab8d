//! Map graph documents and their conversion into a routable network

use std::{fs::File, io::BufReader, path::Path};

use hashbrown::{HashMap, HashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::{
    Coordinate, Error, Meters, Seconds,
    model::{
        RoadEdge, RoadGraph, RoadNode, TrafficTable,
        traffic::{FREE_FLOW, validate_multiplier},
    },
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapData {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to the great circle distance between the endpoints
    #[serde(default)]
    pub length_m: Option<Meters>,
    /// Defaults to `length / speed`
    #[serde(default)]
    pub base_time_s: Option<Seconds>,
    #[serde(default)]
    pub speed_kmh: Option<f64>,
    #[serde(default)]
    pub traffic_multiplier: Option<f64>,
    #[serde(default)]
    pub bidirectional: bool,
}

impl MapData {
    /// Reads a JSON map document
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Builds the road graph and the traffic table
    ///
    /// Two-way edges become two directed edges sharing one traffic slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] describing the first invalid record
    pub fn build(&self, default_speed_kmh: f64) -> Result<(RoadGraph, TrafficTable), Error> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len() * 2);
        let mut node_lookup: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for record in &self.nodes {
            let coordinate = Coordinate::new(record.lat, record.lon).map_err(|_| {
                Error::InvalidData(format!("Node {} has an invalid coordinate", record.id))
            })?;
            let idx = graph.add_node(RoadNode {
                id: record.id.clone(),
                geometry: coordinate.to_point(),
            });
            if node_lookup.insert(record.id.as_str(), idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate node id: {}",
                    record.id
                )));
            }
        }

        let mut seen_edges = HashSet::with_capacity(self.edges.len());
        let mut slots = Vec::with_capacity(self.edges.len());

        for record in &self.edges {
            if !seen_edges.insert(record.id.as_str()) {
                return Err(Error::InvalidData(format!(
                    "Duplicate edge id: {}",
                    record.id
                )));
            }
            let from = resolve_node(&node_lookup, &record.id, &record.from)?;
            let to = resolve_node(&node_lookup, &record.id, &record.to)?;

            let length = match record.length_m {
                Some(length) => length,
                None => Coordinate::from(graph[from].geometry)
                    .distance_to(&Coordinate::from(graph[to].geometry)),
            };
            if !(length.is_finite() && length >= 0.0) {
                return Err(Error::InvalidData(format!(
                    "Edge {} has an invalid length",
                    record.id
                )));
            }

            let base_time = match record.base_time_s {
                Some(time) => time,
                None => {
                    let speed = record.speed_kmh.unwrap_or(default_speed_kmh);
                    if !(speed.is_finite() && speed > 0.0) {
                        return Err(Error::InvalidData(format!(
                            "Edge {} has an invalid speed",
                            record.id
                        )));
                    }
                    length / (speed / 3.6)
                }
            };
            if !(base_time.is_finite() && base_time >= 0.0) {
                return Err(Error::InvalidData(format!(
                    "Edge {} has an invalid base time",
                    record.id
                )));
            }

            let multiplier = record.traffic_multiplier.unwrap_or(FREE_FLOW);
            validate_multiplier(multiplier).map_err(|_| {
                Error::InvalidData(format!(
                    "Edge {} has a traffic multiplier below 1.0",
                    record.id
                ))
            })?;

            let edge = RoadEdge {
                id: record.id.clone(),
                name: record.name.clone(),
                length,
                base_time,
                traffic_slot: slots.len(),
            };
            if record.bidirectional {
                graph.add_edge(to, from, edge.clone());
            }
            graph.add_edge(from, to, edge);
            slots.push((record.id.clone(), multiplier));
        }

        let traffic = TrafficTable::new(slots)?;
        Ok((RoadGraph::new(graph), traffic))
    }
}

fn resolve_node(
    lookup: &HashMap<&str, NodeIndex>,
    edge_id: &str,
    node_id: &str,
) -> Result<NodeIndex, Error> {
    lookup.get(node_id).copied().ok_or_else(|| {
        Error::InvalidData(format!("Edge {edge_id} references unknown node {node_id}"))
    })
}
