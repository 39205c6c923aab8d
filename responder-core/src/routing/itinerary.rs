//! Query results as consumed by the front end

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{Meters, Seconds, ServiceLocation};

/// Qualitative traffic label shown next to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficStatus {
    Light,
    Moderate,
    Heavy,
}

impl TrafficStatus {
    /// Bands a time-weighted average multiplier: `< 1.15` light, `< 1.5` moderate
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier < 1.15 {
            TrafficStatus::Light
        } else if multiplier < 1.5 {
            TrafficStatus::Moderate
        } else {
            TrafficStatus::Heavy
        }
    }

    /// Label for a path from its free-flow and its loaded travel time
    pub fn from_times(free_flow: Seconds, loaded: Seconds) -> Self {
        if free_flow <= 0.0 {
            return TrafficStatus::Light;
        }
        Self::from_multiplier(loaded / free_flow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficStatus::Light => "light",
            TrafficStatus::Moderate => "moderate",
            TrafficStatus::Heavy => "heavy",
        }
    }
}

impl fmt::Display for TrafficStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn-by-turn instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text, e.g. `Turn right on Medical Center Dr`
    pub step: String,
    pub distance: Meters,
    pub duration: Seconds,
}

/// Summary of a route that was not chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub name: String,
    pub duration: Seconds,
    pub distance: Meters,
    pub traffic: TrafficStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub destination_id: String,
    /// Destination display name
    pub destination: String,
    pub address: String,
    pub phone: String,
    pub distance: Meters,
    pub duration: Seconds,
    pub traffic_status: TrafficStatus,
    pub eta: DateTime<FixedOffset>,
    pub route: Vec<RouteStep>,
    pub alternatives: Vec<AlternativeRoute>,
}

/// A service ranked by travel time from the query origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestService {
    #[serde(flatten)]
    pub service: ServiceLocation,
    /// Length of the fastest path, in meters
    pub distance: Meters,
    /// Estimated travel time, in seconds
    pub duration: Seconds,
}
