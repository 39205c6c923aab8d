//! Road network components - nodes and edges

use geo::Point;

use crate::{Cost, Meters, Seconds};

/// Road graph node (intersection or point of interest)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// External identifier of the node
    pub id: String,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Directed road graph edge (street segment)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// External identifier, shared by both directions of a two-way street
    pub id: String,
    /// Road name used for turn-by-turn instructions
    pub name: Option<String>,
    /// Segment length in meters
    pub length: Meters,
    /// Free-flow traversal time in seconds
    pub base_time: Seconds,
    /// Index of the traffic multiplier in the [`TrafficTable`](crate::TrafficTable)
    pub traffic_slot: usize,
}

impl RoadEdge {
    /// Traversal cost with the given traffic multiplier and extra penalty
    pub fn cost(&self, multiplier: f64, penalty: f64) -> Cost {
        let millis = (self.base_time * multiplier * penalty * 1000.0).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cost = millis.max(0.0) as Cost;
        cost
    }

    pub fn road_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed road")
    }
}
