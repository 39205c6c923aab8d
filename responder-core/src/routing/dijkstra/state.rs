use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::Cost;

#[derive(Copy, Clone, Eq, PartialEq)]
pub(super) struct State {
    pub(super) cost: Cost,
    pub(super) node: NodeIndex,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap),
        // equal costs settle in node order so results are deterministic
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best known way of reaching a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Label {
    pub(crate) cost: Cost,
    /// Length of the path that produced `cost`, in meters
    pub(crate) distance: f64,
}

impl Label {
    /// Cheaper wins, equal cost prefers the shorter path
    pub(super) fn improves_on(&self, other: &Label) -> bool {
        self.cost < other.cost || (self.cost == other.cost && self.distance < other.distance)
    }
}
