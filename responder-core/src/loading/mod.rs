//! This module is responsible for loading the map graph and the service
//! registry and for building a route engine from them.

mod builder;
mod config;
pub mod map_data;
pub mod registry;

pub use builder::create_route_engine;
pub use config::RouteEngineConfig;
pub use map_data::{EdgeRecord, MapData, NodeRecord};
pub use registry::ServiceRegistry;
