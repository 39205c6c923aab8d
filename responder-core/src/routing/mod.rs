//! Shortest path searches and the two query kinds built on them

mod dijkstra;
pub(crate) mod guard;
mod instructions;
pub mod itinerary;
pub(crate) mod nearest;
pub(crate) mod route;

pub use guard::CancelFlag;
pub use itinerary::{AlternativeRoute, NearestService, RouteResult, RouteStep, TrafficStatus};
