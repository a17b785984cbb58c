//! presenced - area presence daemon
//!
//! Clients hold a WebSocket open, announce who they are and which area
//! they occupy, and receive live membership updates for everyone else.

mod config;
mod error;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::PresenceActor;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// How often the presence summary is logged.
const SUMMARY_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting presenced"
    );

    let presence = PresenceActor::spawn(config.limits.event_queue);
    info!(capacity = config.limits.event_queue, "Presence actor started");

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        let presence = presence.clone();
        tokio::spawn(async move {
            http::run_http_server(metrics_port, presence).await;
        });
        info!(port = metrics_port, "Diagnostics HTTP server started");
    }

    // Periodic presence summary
    {
        let presence = presence.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SUMMARY_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(snapshot) = presence.snapshot().await else {
                    break;
                };
                info!(
                    connections = snapshot.connections,
                    active = snapshot.active_area_users.len(),
                    pending = snapshot.users_pending_area_entry.len(),
                    visitors = snapshot.visitors.len(),
                    areas = snapshot.areas.len(),
                    "Presence summary"
                );
            }
        });
    }

    let gateway = Gateway::bind(config.listen, config.limits, presence).await?;
    info!(address = %gateway.local_addr()?, "Accepting connections");

    tokio::select! {
        result = gateway.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            Ok(())
        }
    }
}
