//! The route engine: shared graph state and the query entry points

use chrono::{DateTime, FixedOffset};
use log::debug;

use crate::{
    Coordinate, Error, RouteEngineConfig, ServiceCategory, ServiceLocation,
    loading::MapData,
    model::{RoadGraph, TrafficTable},
    routing::{CancelFlag, NearestService, RouteResult, guard::QueryGuard, nearest, route},
};

/// Road graph, live traffic and settings shared by all queries.
///
/// Queries only read shared state and may run concurrently from any number of
/// threads; the traffic feed writes through [`RouteEngine::update_edge`]
/// without blocking them.
#[derive(Debug)]
pub struct RouteEngine {
    graph: RoadGraph,
    traffic: TrafficTable,
    config: RouteEngineConfig,
}

/// Outcome of a batch of traffic updates
#[derive(Debug, Default)]
pub struct TrafficUpdateReport {
    pub applied: usize,
    pub rejected: Vec<(String, Error)>,
}

impl RouteEngine {
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(
        graph: RoadGraph,
        traffic: TrafficTable,
        config: RouteEngineConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            graph,
            traffic,
            config,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the configuration or the map data is invalid
    pub fn from_map_data(data: &MapData, config: RouteEngineConfig) -> Result<Self, Error> {
        config.validate()?;
        let (graph, traffic) = data.build(config.default_speed_kmh)?;
        Self::new(graph, traffic, config)
    }

    /// Services ranked by estimated travel time from `origin`.
    ///
    /// Ordered by duration, then distance, then id. At most `limit` entries;
    /// services outside the search radius, off the network or unreachable
    /// are left out without failing the query.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCoordinate`] for an invalid origin or service coordinate
    /// - [`Error::InvalidArgument`] when `limit` is zero
    /// - [`Error::NoServicesAvailable`] when no available service matches `category`
    /// - [`Error::OriginOffNetwork`] when the origin is too far from any road
    /// - [`Error::RouteComputationTimeout`] / [`Error::Cancelled`]
    pub fn find_nearest_services(
        &self,
        origin: Coordinate,
        services: &[ServiceLocation],
        category: Option<ServiceCategory>,
        limit: usize,
        cancel: &CancelFlag,
    ) -> Result<Vec<NearestService>, Error> {
        let guard = QueryGuard::new(cancel, self.config.compute_budget());
        let result = nearest::find_nearest_services(
            &self.graph,
            &self.traffic,
            &self.config,
            origin,
            services,
            category,
            limit,
            &guard,
        );
        if let Err(err) = &result {
            debug!("Nearest services query failed: {err}");
        }
        result
    }

    /// Fastest route to `destination` with up to `alternatives` distinct
    /// alternatives. The ETA is `departure` plus the route duration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCoordinate`] for an invalid origin or destination
    /// - [`Error::OriginOffNetwork`] when the origin is too far from any road
    /// - [`Error::DestinationUnreachable`] when no path exists
    /// - [`Error::RouteComputationTimeout`] / [`Error::Cancelled`]
    pub fn compute_route(
        &self,
        origin: Coordinate,
        destination: &ServiceLocation,
        alternatives: usize,
        departure: DateTime<FixedOffset>,
        cancel: &CancelFlag,
    ) -> Result<RouteResult, Error> {
        let guard = QueryGuard::new(cancel, self.config.compute_budget());
        let result = route::compute_route(
            &self.graph,
            &self.traffic,
            &self.config,
            origin,
            destination,
            alternatives,
            departure,
            &guard,
        );
        if let Err(err) = &result {
            debug!("Route query to {} failed: {err}", destination.id);
        }
        result
    }

    /// Replaces the traffic multiplier of one edge, returning the previous value
    ///
    /// # Errors
    ///
    /// [`Error::UnknownEdge`] or [`Error::InvalidMultiplier`]
    pub fn update_edge(&self, edge_id: &str, multiplier: f64) -> Result<f64, Error> {
        self.traffic.update_edge(edge_id, multiplier)
    }

    /// Applies every valid update and collects the rejected ones
    pub fn update_edges<I>(&self, updates: I) -> TrafficUpdateReport
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut report = TrafficUpdateReport::default();
        for (edge_id, multiplier) in updates {
            match self.traffic.update_edge(&edge_id, multiplier) {
                Ok(_) => report.applied += 1,
                Err(err) => report.rejected.push((edge_id, err)),
            }
        }
        debug!(
            "Traffic feed: {} updates applied, {} rejected",
            report.applied,
            report.rejected.len()
        );
        report
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn traffic(&self) -> &TrafficTable {
        &self.traffic
    }

    pub fn config(&self) -> &RouteEngineConfig {
        &self.config
    }
}
