//! Best route to a destination plus edge-penalty alternatives

use chrono::{DateTime, FixedOffset, TimeDelta};
use hashbrown::{HashMap, HashSet};
use log::{debug, trace};
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::{
    AlternativeRoute, RouteResult, TrafficStatus,
    dijkstra::{TracedPath, dijkstra_path},
    guard::QueryGuard,
    instructions::build_steps,
};
use crate::{
    Coordinate, Cost, Error, Meters, RouteEngineConfig, ServiceLocation, cost_to_seconds,
    model::{RoadGraph, TrafficTable, traffic::WeightSnapshot},
};

/// Per-edge figures of a path under the query's weight snapshot
#[derive(Debug)]
struct PathSummary {
    edges: Vec<EdgeIndex>,
    costs: Vec<Cost>,
    cost: Cost,
    distance: Meters,
    traffic: TrafficStatus,
}

impl PathSummary {
    fn new(graph: &RoadGraph, snapshot: &mut WeightSnapshot<'_>, path: TracedPath) -> Self {
        let mut costs = Vec::with_capacity(path.edges.len());
        let mut distance = 0.0;
        let mut free_flow = 0.0;
        let mut loaded = 0.0;

        for &edge_idx in &path.edges {
            let edge = graph.edge(edge_idx);
            let multiplier = snapshot.multiplier(edge.traffic_slot);
            costs.push(edge.cost(multiplier, 1.0));
            distance += edge.length;
            free_flow += edge.base_time;
            loaded += edge.base_time * multiplier;
        }

        Self {
            cost: costs.iter().sum(),
            costs,
            distance,
            traffic: TrafficStatus::from_times(free_flow, loaded),
            edges: path.edges,
        }
    }

    fn edge_set(&self) -> HashSet<EdgeIndex> {
        self.edges.iter().copied().collect()
    }
}

/// Share of edges two paths have in common, relative to the shorter one
fn shared_fraction(a: &HashSet<EdgeIndex>, b: &HashSet<EdgeIndex>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return if a.len() == b.len() { 1.0 } else { 0.0 };
    }
    #[allow(clippy::cast_precision_loss)]
    let shared = a.intersection(b).count() as f64;
    #[allow(clippy::cast_precision_loss)]
    let smaller = smaller as f64;
    shared / smaller
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn compute_route(
    graph: &RoadGraph,
    traffic: &TrafficTable,
    config: &RouteEngineConfig,
    origin: Coordinate,
    destination: &ServiceLocation,
    alternatives_requested: usize,
    departure: DateTime<FixedOffset>,
    guard: &QueryGuard<'_>,
) -> Result<RouteResult, Error> {
    origin.validate()?;
    destination.coordinate.validate()?;

    let (start, _) = graph
        .nearest_node(&origin, config.max_snap_distance_m)
        .ok_or(Error::OriginOffNetwork)?;
    let not_reachable = || Error::DestinationUnreachable(destination.id.clone());
    let (target, _) = graph
        .nearest_node(&destination.coordinate, config.max_snap_distance_m)
        .ok_or_else(not_reachable)?;

    let mut snapshot = WeightSnapshot::new(traffic);
    let primary = dijkstra_path(graph, start, target, guard, |_, edge| {
        edge.cost(snapshot.multiplier(edge.traffic_slot), 1.0)
    })?
    .ok_or_else(not_reachable)?;
    let primary = PathSummary::new(graph, &mut snapshot, primary);

    let alternatives = if alternatives_requested == 0 || primary.edges.is_empty() {
        Vec::new()
    } else {
        find_alternatives(
            graph,
            &mut snapshot,
            config,
            &primary,
            (start, target),
            alternatives_requested,
            guard,
        )?
    };

    let eta = TimeDelta::try_milliseconds(i64::try_from(primary.cost).unwrap_or(i64::MAX))
        .and_then(|delta| departure.checked_add_signed(delta))
        .ok_or_else(|| Error::InvalidArgument("ETA is out of range".to_string()))?;

    let route = build_steps(graph, &primary.edges, &primary.costs, &destination.name);
    debug!(
        "Route to {}: {:.0}m, {:.0}s, {} steps, {} alternatives",
        destination.id,
        primary.distance,
        cost_to_seconds(primary.cost),
        route.len(),
        alternatives.len()
    );

    Ok(RouteResult {
        destination_id: destination.id.clone(),
        destination: destination.name.clone(),
        address: destination.address.clone(),
        phone: destination.phone.clone(),
        distance: primary.distance,
        duration: cost_to_seconds(primary.cost),
        traffic_status: primary.traffic,
        eta,
        route,
        alternatives,
    })
}

/// Named alternatives to `primary`, fastest first
fn find_alternatives(
    graph: &RoadGraph,
    snapshot: &mut WeightSnapshot<'_>,
    config: &RouteEngineConfig,
    primary: &PathSummary,
    endpoints: (NodeIndex, NodeIndex),
    requested: usize,
    guard: &QueryGuard<'_>,
) -> Result<Vec<AlternativeRoute>, Error> {
    let kept = search_alternatives(
        graph,
        snapshot,
        config,
        primary,
        endpoints,
        requested,
        guard,
    )?;

    let primary_roads: HashSet<&str> = primary
        .edges
        .iter()
        .map(|&edge| graph.edge(edge).road_name())
        .collect();

    Ok(kept
        .iter()
        .enumerate()
        .map(|(index, path)| AlternativeRoute {
            name: alternative_name(graph, path, &primary_roads)
                .unwrap_or_else(|| format!("Alternative {}", index + 1)),
            duration: cost_to_seconds(path.cost),
            distance: path.distance,
            traffic: path.traffic,
        })
        .collect())
}

/// k-shortest-paths with edge penalties.
///
/// After every search the edges of the found path are made more expensive and
/// the search runs again. A path is kept when it shares at most
/// `max_shared_edge_fraction` of its edges with the primary and with every
/// alternative kept so far.
fn search_alternatives(
    graph: &RoadGraph,
    snapshot: &mut WeightSnapshot<'_>,
    config: &RouteEngineConfig,
    primary: &PathSummary,
    (start, target): (NodeIndex, NodeIndex),
    requested: usize,
    guard: &QueryGuard<'_>,
) -> Result<Vec<PathSummary>, Error> {
    let mut penalties: HashMap<EdgeIndex, f64> = HashMap::new();
    penalise(&mut penalties, &primary.edges, config.alternative_penalty);

    let mut kept_sets = vec![primary.edge_set()];
    let mut kept: Vec<PathSummary> = Vec::new();

    let max_rounds = requested.saturating_mul(config.alternative_attempts);
    for round in 0..max_rounds {
        if kept.len() == requested {
            break;
        }

        let Some(path) = dijkstra_path(graph, start, target, guard, |edge_idx, edge| {
            let penalty = penalties.get(&edge_idx).copied().unwrap_or(1.0);
            edge.cost(snapshot.multiplier(edge.traffic_slot), penalty)
        })?
        else {
            break;
        };
        penalise(&mut penalties, &path.edges, config.alternative_penalty);

        let candidate = PathSummary::new(graph, snapshot, path);
        let candidate_set = candidate.edge_set();
        let distinct = kept_sets
            .iter()
            .all(|other| shared_fraction(&candidate_set, other) <= config.max_shared_edge_fraction);

        if distinct {
            kept_sets.push(candidate_set);
            kept.push(candidate);
        } else {
            trace!("Penalty round {round} produced an overlapping path");
        }
    }

    kept.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.distance.total_cmp(&b.distance)));
    Ok(kept)
}

fn penalise(penalties: &mut HashMap<EdgeIndex, f64>, edges: &[EdgeIndex], factor: f64) {
    for &edge in edges {
        *penalties.entry(edge).or_insert(1.0) *= factor;
    }
}

/// `Via <road>` for the longest named road the primary path does not use
fn alternative_name(
    graph: &RoadGraph,
    path: &PathSummary,
    primary_roads: &HashSet<&str>,
) -> Option<String> {
    let mut lengths: HashMap<&str, Meters> = HashMap::new();
    for &edge_idx in &path.edges {
        let edge = graph.edge(edge_idx);
        if let Some(name) = edge.name.as_deref() {
            if !primary_roads.contains(name) {
                *lengths.entry(name).or_insert(0.0) += edge.length;
            }
        }
    }

    lengths
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| format!("Via {name}"))
}
