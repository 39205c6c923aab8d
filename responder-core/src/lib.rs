//! Routing and ETA engine for emergency responders.
//!
//! The crate loads a road graph, keeps a live table of per-edge traffic
//! multipliers and answers two kinds of queries against it: which emergency
//! services are the fastest to reach from a point, and what the best route
//! (plus a few distinct alternatives) to a chosen service looks like.

pub mod engine;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use engine::{RouteEngine, TrafficUpdateReport};
pub use error::Error;
pub use loading::{RouteEngineConfig, create_route_engine};
pub use model::{Coordinate, RoadGraph, ServiceCategory, ServiceLocation, TrafficTable};
pub use routing::{
    AlternativeRoute, CancelFlag, NearestService, RouteResult, RouteStep, TrafficStatus,
};

/// Travel cost used by the shortest path searches, in milliseconds
pub type Cost = u64;

/// Distance in meters
pub type Meters = f64;

/// Duration in seconds
pub type Seconds = f64;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn cost_to_seconds(cost: Cost) -> Seconds {
    #[allow(clippy::cast_precision_loss)]
    let millis = cost as f64;
    millis / 1000.0
}
