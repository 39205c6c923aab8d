//! Data model for emergency routing
//!
//! Contains the coordinate and service records supplied with each query,
//! the road network the engine routes over and the live traffic table.

pub mod coordinate;
pub mod service;
pub mod streets;
pub mod traffic;

pub use coordinate::Coordinate;
pub use service::{ServiceCategory, ServiceLocation};
pub use streets::{RoadEdge, RoadGraph, RoadNode};
pub use traffic::TrafficTable;
