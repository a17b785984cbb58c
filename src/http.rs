//! Diagnostics HTTP server.
//!
//! Serves Prometheus text on `/metrics` and a JSON count of the presence
//! registries on `/presence`, both on the metrics port.

use crate::state::{PresenceHandle, PresenceSnapshot};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;

/// Registry sizes reported by `/presence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceCounts {
    pub connections: usize,
    pub active_area_users: usize,
    pub users_pending_area_entry: usize,
    pub visitors: usize,
    pub areas: usize,
}

impl From<&PresenceSnapshot> for PresenceCounts {
    fn from(snapshot: &PresenceSnapshot) -> Self {
        Self {
            connections: snapshot.connections,
            active_area_users: snapshot.active_area_users.len(),
            users_pending_area_entry: snapshot.users_pending_area_entry.len(),
            visitors: snapshot.visitors.len(),
            areas: snapshot.areas.len(),
        }
    }
}

async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

async fn presence_handler(
    State(presence): State<PresenceHandle>,
) -> Result<Json<PresenceCounts>, StatusCode> {
    presence
        .snapshot()
        .await
        .map(|snapshot| Json(PresenceCounts::from(&snapshot)))
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

fn router(presence: PresenceHandle) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/presence", get(presence_handler))
        .with_state(presence)
}

/// Run the diagnostics server on `0.0.0.0:port` until it fails.
pub async fn run_http_server(port: u16, presence: PresenceHandle) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind diagnostics server");
            return;
        }
    };
    tracing::info!(%addr, routes = "/metrics,/presence", "Diagnostics server listening");

    if let Err(e) = axum::serve(listener, router(presence)).await {
        tracing::error!(%addr, error = %e, "Diagnostics server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PresenceActor;

    #[tokio::test]
    async fn presence_counts_follow_the_actor() {
        let handle = PresenceActor::spawn(8);
        let Json(counts) = presence_handler(State(handle)).await.unwrap();
        assert_eq!(
            counts,
            PresenceCounts {
                connections: 0,
                active_area_users: 0,
                users_pending_area_entry: 0,
                visitors: 0,
                areas: 0,
            }
        );
    }

    #[test]
    fn counts_are_taken_from_snapshot() {
        let mut snapshot = PresenceSnapshot {
            connections: 3,
            ..Default::default()
        };
        snapshot
            .areas
            .insert("lobby-1".into(), ["s1".to_string()].into_iter().collect());
        let counts = PresenceCounts::from(&snapshot);
        assert_eq!(counts.connections, 3);
        assert_eq!(counts.areas, 1);
        assert_eq!(counts.visitors, 0);
    }
}
