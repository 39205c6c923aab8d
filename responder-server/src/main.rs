use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use responder_core::{create_route_engine, loading::ServiceRegistry};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{config::ServerConfig, state::AppState};

mod api;
mod config;
mod error;
mod state;

#[derive(Debug, Parser)]
#[command(version, about = "HTTP API for emergency responder routing")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "responder.toml")]
    config: PathBuf,

    /// Overrides the bind address from the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_path(&args.config)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let graph_path = config.graph_path.clone();
    let services_path = config.services_path.clone();
    let engine_config = config.engine.clone();
    let (engine, registry) = tokio::task::spawn_blocking(move || {
        let engine = create_route_engine(&graph_path, engine_config)?;
        let registry = ServiceRegistry::from_path(&services_path)?;
        Ok::<_, responder_core::Error>((engine, registry))
    })
    .await??;

    let state = AppState::new(engine, registry);
    let app = api::router(state, config.request_timeout(), config.concurrency_limit);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(err) => {
            error!("Cannot listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    }
}
