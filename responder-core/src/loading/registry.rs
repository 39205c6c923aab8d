//! Service registry: the set of emergency services known to the deployment

use std::{fs::File, io::BufReader, path::Path};

use log::info;

use crate::{Error, ServiceCategory, ServiceLocation};

/// Services sorted by id
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<ServiceLocation>,
}

impl ServiceRegistry {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] on duplicate ids or invalid coordinates
    pub fn new(mut services: Vec<ServiceLocation>) -> Result<Self, Error> {
        for service in &services {
            service.coordinate.validate().map_err(|_| {
                Error::InvalidData(format!("Service {} has an invalid coordinate", service.id))
            })?;
        }

        services.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = services.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(Error::InvalidData(format!(
                "Duplicate service id: {}",
                pair[0].id
            )));
        }

        Ok(Self { services })
    }

    /// Reads a JSON array of services
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a record is invalid
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let services: Vec<ServiceLocation> = serde_json::from_reader(reader)?;
        let registry = Self::new(services)?;
        info!(
            "Loaded {} services from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&ServiceLocation> {
        self.services
            .binary_search_by(|service| service.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.services[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceLocation> {
        self.services.iter()
    }

    /// All services in id order
    pub fn as_slice(&self) -> &[ServiceLocation] {
        &self.services
    }

    pub fn count_in(&self, category: ServiceCategory) -> usize {
        self.iter()
            .filter(|service| service.category == category)
            .count()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
