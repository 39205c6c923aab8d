//! Emergency service records supplied by the service registry

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Hospital,
    Ambulance,
    Police,
    Fire,
}

impl ServiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Hospital => "hospital",
            ServiceCategory::Ambulance => "ambulance",
            ServiceCategory::Police => "police",
            ServiceCategory::Fire => "fire",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hospital, ambulance unit, police or fire station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
    /// Unique identifier, e.g. `hospital-1`
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ServiceCategory,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub address: String,
    pub phone: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl ServiceLocation {
    /// Whether the service can be offered for a query with the given filter
    pub fn is_candidate(&self, category: Option<ServiceCategory>) -> bool {
        self.available && category.is_none_or(|wanted| wanted == self.category)
    }
}
