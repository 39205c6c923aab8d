//! Turn-by-turn instructions from a list of traversed edges

use itertools::Itertools;
use petgraph::graph::EdgeIndex;

use super::RouteStep;
use crate::{Cost, Meters, RoadGraph, cost_to_seconds};

/// Consecutive edges on the same road, merged into one instruction
struct RoadRun<'a> {
    name: &'a str,
    distance: Meters,
    cost: Cost,
    entry_bearing: f64,
    exit_bearing: f64,
}

/// Builds the step list for a path.
///
/// `costs[i]` is the traversal cost that was used for `edges[i]`. The last
/// step is always `Arrive at <destination>` and carries no distance, so the
/// step distances add up to the path length.
pub(crate) fn build_steps(
    graph: &RoadGraph,
    edges: &[EdgeIndex],
    costs: &[Cost],
    destination: &str,
) -> Vec<RouteStep> {
    let runs: Vec<RoadRun<'_>> = edges
        .iter()
        .zip(costs)
        // unnamed edges key on their own index so they never merge
        .chunk_by(|(edge, _)| graph.edge(**edge).name.as_deref().ok_or(**edge))
        .into_iter()
        .map(|(_, group)| {
            let group: Vec<_> = group.collect();
            let first = *group[0].0;
            let last = *group[group.len() - 1].0;
            RoadRun {
                name: graph.edge(first).road_name(),
                distance: group.iter().map(|(edge, _)| graph.edge(**edge).length).sum(),
                cost: group.iter().map(|(_, cost)| **cost).sum(),
                entry_bearing: edge_bearing(graph, first),
                exit_bearing: edge_bearing(graph, last),
            }
        })
        .collect();

    let mut steps = Vec::with_capacity(runs.len() + 1);
    let mut previous_bearing: Option<f64> = None;
    for run in &runs {
        let instruction = match previous_bearing {
            None => format!("Head {} on {}", compass(run.entry_bearing), run.name),
            Some(previous) => {
                format!("{} {}", manoeuvre(previous, run.entry_bearing), run.name)
            }
        };
        steps.push(RouteStep {
            step: instruction,
            distance: run.distance,
            duration: cost_to_seconds(run.cost),
        });
        previous_bearing = Some(run.exit_bearing);
    }

    steps.push(RouteStep {
        step: format!("Arrive at {destination}"),
        distance: 0.0,
        duration: 0.0,
    });
    steps
}

fn edge_bearing(graph: &RoadGraph, edge: EdgeIndex) -> f64 {
    graph.endpoints(edge).map_or(0.0, |(source, target)| {
        graph
            .node_coordinate(source)
            .bearing_to(&graph.node_coordinate(target))
    })
}

/// Eight-point compass name of a bearing
fn compass(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "north",
        "northeast",
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
    ];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    POINTS[sector]
}

/// Instruction verb for the change of heading between two segments
fn manoeuvre(from: f64, to: f64) -> &'static str {
    // signed turn angle in -180..180, positive is clockwise (right)
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    match delta {
        d if d.abs() < 20.0 => "Continue on",
        d if d.abs() > 150.0 => "Make a U-turn onto",
        d if d > 45.0 => "Turn right on",
        d if d < -45.0 => "Turn left on",
        d if d > 0.0 => "Keep right on",
        _ => "Keep left on",
    }
}
