// Re-export key components
pub use crate::engine::{RouteEngine, TrafficUpdateReport};
pub use crate::loading::{MapData, RouteEngineConfig, ServiceRegistry, create_route_engine};
pub use crate::model::{Coordinate, RoadGraph, ServiceCategory, ServiceLocation, TrafficTable};
pub use crate::routing::{
    AlternativeRoute, CancelFlag, NearestService, RouteResult, RouteStep, TrafficStatus,
};

// Core scalar types
pub use crate::Cost; // milliseconds
pub use crate::Meters;
pub use crate::Seconds;

pub use crate::Error;
