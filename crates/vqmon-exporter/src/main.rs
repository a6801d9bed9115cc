//! vqmon exporter (scrape deployment)
//!
//! - `/metrics`: text exposition of the registry
//! - `/health`: liveness
//! - background simulation of stutter and play metrics

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use vqmon_core::error::MetricsError;
use vqmon_exporter::{app_state, config, obs, router, simulate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = config::Cli::parse().config;
    let (cfg, found) = config::load_or_default(&path)?;
    obs::init_tracing(&cfg.log)?;
    if !found {
        tracing::warn!(%path, "config file not found, using built-in defaults");
    }

    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .map_err(|e| MetricsError::InvalidConfig(format!("exporter.listen: {e}")))?;

    let state = app_state::AppState::from_catalog(&cfg.catalog)?;
    simulate::spawn(
        state.registry(),
        cfg.simulation.clone(),
        Duration::from_millis(cfg.exporter.update_interval_ms),
    );

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(listen).await?;

    tracing::info!(%listen, "vqmon-exporter starting");
    tracing::info!("metrics available at http://{listen}/metrics");
    tracing::info!("health check at http://{listen}/health");

    axum::serve(listener, app).await?;
    Ok(())
}
