//! Ranking emergency services by travel time from an origin

use log::{debug, trace};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use super::{NearestService, dijkstra::dijkstra_path_weights, guard::QueryGuard};
use crate::{
    Coordinate, Error, RouteEngineConfig, ServiceCategory, ServiceLocation, cost_to_seconds,
    model::{RoadGraph, TrafficTable, traffic::WeightSnapshot},
};

/// A candidate that passed the radius pre-filter and snapped onto the graph
struct SnappedCandidate<'a> {
    service: &'a ServiceLocation,
    node: NodeIndex,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn find_nearest_services(
    graph: &RoadGraph,
    traffic: &TrafficTable,
    config: &RouteEngineConfig,
    origin: Coordinate,
    services: &[ServiceLocation],
    category: Option<ServiceCategory>,
    limit: usize,
    guard: &QueryGuard<'_>,
) -> Result<Vec<NearestService>, Error> {
    origin.validate()?;
    if limit == 0 {
        return Err(Error::InvalidArgument("limit must be at least 1".to_string()));
    }

    let candidates: Vec<&ServiceLocation> = services
        .iter()
        .filter(|service| service.is_candidate(category))
        .collect();
    if candidates.is_empty() {
        return Err(Error::NoServicesAvailable);
    }
    for service in &candidates {
        service.coordinate.validate()?;
    }

    let (origin_node, _) = graph
        .nearest_node(&origin, config.max_snap_distance_m)
        .ok_or(Error::OriginOffNetwork)?;

    let snapped = snap_candidates(graph, config, origin, &candidates);
    if snapped.is_empty() {
        debug!("No service within {}m of the origin", config.max_radius_m);
        return Ok(Vec::new());
    }

    let mut targets: Vec<NodeIndex> = snapped.iter().map(|candidate| candidate.node).collect();
    targets.sort_unstable();
    targets.dedup();

    let mut snapshot = WeightSnapshot::new(traffic);
    let labels = dijkstra_path_weights(graph, origin_node, &targets, guard, |_, edge| {
        edge.cost(snapshot.multiplier(edge.traffic_slot), 1.0)
    })?;

    let mut ranked: Vec<_> = snapped
        .into_iter()
        .filter_map(|candidate| {
            let Some(label) = labels.get(&candidate.node) else {
                trace!("Service {} is unreachable from the origin", candidate.service.id);
                return None;
            };
            Some((label.cost, label.distance, candidate.service))
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| a.2.id.cmp(&b.2.id))
    });
    ranked.truncate(limit);

    debug!(
        "Ranked {} of {} candidate services",
        ranked.len(),
        candidates.len()
    );

    Ok(ranked
        .into_iter()
        .map(|(cost, distance, service)| NearestService {
            service: service.clone(),
            distance,
            duration: cost_to_seconds(cost),
        })
        .collect())
}

/// Straight-line pre-filter followed by snapping each survivor onto the graph
fn snap_candidates<'a>(
    graph: &RoadGraph,
    config: &RouteEngineConfig,
    origin: Coordinate,
    candidates: &[&'a ServiceLocation],
) -> Vec<SnappedCandidate<'a>> {
    candidates
        .par_iter()
        .filter_map(|&service| {
            let straight_line = origin.distance_to(&service.coordinate);
            if straight_line > config.max_radius_m {
                trace!(
                    "Service {} is {straight_line:.0}m away, outside the search radius",
                    service.id
                );
                return None;
            }
            match graph.nearest_node(&service.coordinate, config.max_snap_distance_m) {
                Some((node, _)) => Some(SnappedCandidate { service, node }),
                None => {
                    trace!("Service {} has no nearby road node", service.id);
                    None
                }
            }
        })
        .collect()
}
