use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No emergency services available for this query")]
    NoServicesAvailable,
    #[error("Destination {0} is unreachable from the origin")]
    DestinationUnreachable(String),
    #[error("Route computation exceeded its budget of {}ms", .0.as_millis())]
    RouteComputationTimeout(Duration),
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Route computation was cancelled")]
    Cancelled,
    #[error("Origin is not close enough to the road network")]
    OriginOffNetwork,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unknown edge: {0}")]
    UnknownEdge(String),
    #[error("Invalid traffic multiplier {0}, expected a finite value >= 1.0")]
    InvalidMultiplier(f64),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
