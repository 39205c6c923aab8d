use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Meters};

/// Tunables of the routing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteEngineConfig {
    /// Straight-line radius beyond which services are not considered
    pub max_radius_m: Meters,
    /// Maximum distance between a coordinate and the node it snaps to
    pub max_snap_distance_m: Meters,
    /// Wall clock budget for a single query
    pub compute_budget_ms: u64,
    /// Factor applied to the edges of every found path before searching again
    pub alternative_penalty: f64,
    /// Largest share of edges an alternative may have in common with another route
    pub max_shared_edge_fraction: f64,
    /// Penalty rounds allowed per requested alternative
    pub alternative_attempts: usize,
    /// Speed used for edges that carry neither a base time nor a speed
    pub default_speed_kmh: f64,
}

impl Default for RouteEngineConfig {
    fn default() -> Self {
        Self {
            max_radius_m: 50_000.0,
            max_snap_distance_m: 1_000.0,
            compute_budget_ms: 2_000,
            alternative_penalty: 2.0,
            max_shared_edge_fraction: 0.5,
            alternative_attempts: 3,
            default_speed_kmh: 40.0,
        }
    }
}

impl RouteEngineConfig {
    pub fn compute_budget(&self) -> Duration {
        Duration::from_millis(self.compute_budget_ms)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] naming the first offending setting
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.max_radius_m.is_finite() && self.max_radius_m > 0.0) {
            return Err(invalid("max_radius_m must be positive"));
        }
        if !(self.max_snap_distance_m.is_finite() && self.max_snap_distance_m >= 0.0) {
            return Err(invalid("max_snap_distance_m must not be negative"));
        }
        if self.compute_budget_ms == 0 {
            return Err(invalid("compute_budget_ms must be positive"));
        }
        if !(self.alternative_penalty.is_finite() && self.alternative_penalty >= 2.0) {
            return Err(invalid("alternative_penalty must be at least 2.0"));
        }
        if !(0.0..=1.0).contains(&self.max_shared_edge_fraction) {
            return Err(invalid("max_shared_edge_fraction must be within 0..=1"));
        }
        if self.alternative_attempts == 0 {
            return Err(invalid("alternative_attempts must be positive"));
        }
        if !(self.default_speed_kmh.is_finite() && self.default_speed_kmh > 0.0) {
            return Err(invalid("default_speed_kmh must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidData(message.to_string())
}
