use std::path::Path;

use log::info;

use super::{config::RouteEngineConfig, map_data::MapData};
use crate::{Error, RouteEngine};

/// Creates a route engine from a JSON map graph on disk
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the map data cannot
/// be read or processed
pub fn create_route_engine(
    graph_path: &Path,
    config: RouteEngineConfig,
) -> Result<RouteEngine, Error> {
    config.validate()?;
    if !graph_path.exists() {
        return Err(Error::InvalidData(format!(
            "Map graph file not found: {}",
            graph_path.display()
        )));
    }

    info!("Processing map graph: {}", graph_path.display());
    let data = MapData::from_path(graph_path)?;
    let engine = RouteEngine::from_map_data(&data, config)?;

    info!(
        "Route engine created with {} nodes, {} directed edges and {} traffic slots",
        engine.graph().node_count(),
        engine.graph().edge_count(),
        engine.traffic().len()
    );
    Ok(engine)
}
