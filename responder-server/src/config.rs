use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use responder_core::RouteEngineConfig;
use serde::Deserialize;

/// Server settings read from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    pub graph_path: PathBuf,
    pub services_path: PathBuf,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    #[serde(default)]
    pub engine: RouteEngineConfig,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_concurrency_limit() -> usize {
    64
}

impl ServerConfig {
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {e}", path.display()))?;
        let mut config: ServerConfig = toml::from_str(&raw)?;
        if config.concurrency_limit == 0 {
            return Err("concurrency_limit must be at least 1".into());
        }

        // relative data paths are resolved against the config file
        if let Some(base) = path.parent() {
            config.graph_path = base.join(&config.graph_path);
            config.services_path = base.join(&config.services_path);
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
