//! Gateway - WebSocket listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket, performs the WebSocket upgrade
//! with origin checks, runs the Connection Gate on the upgrade headers,
//! and spawns a Connection task for each client.

use crate::config::{LimitsConfig, ListenConfig};
use crate::network::{Connection, gate};
use crate::state::{PresenceHandle, SocketIdGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{HeaderMap, StatusCode, header};
use tracing::{Instrument, debug, error, info, instrument, warn};

/// The Gateway accepts incoming WebSocket connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    listen: Arc<ListenConfig>,
    limits: LimitsConfig,
    presence: PresenceHandle,
    socket_ids: SocketIdGenerator,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        listen: ListenConfig,
        limits: LimitsConfig,
        presence: PresenceHandle,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        info!(address = %listen.address, "WebSocket listener bound");

        Ok(Self {
            listener,
            listen: Arc::new(listen),
            limits,
            presence,
            socket_ids: SocketIdGenerator::new(),
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(%addr, "WebSocket connection attempt");

                    let socket_id = self.socket_ids.next();
                    let listen = Arc::clone(&self.listen);
                    let limits = self.limits.clone();
                    let presence = self.presence.clone();
                    let span = crate::telemetry::connection(&socket_id, &addr.to_string());

                    tokio::spawn(
                        async move {
                            serve(stream, addr, socket_id, &listen, limits, presence).await;
                        }
                        .instrument(span),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept WebSocket connection");
                }
            }
        }
    }
}

/// Upgrade one TCP stream and run its connection to completion.
async fn serve(
    stream: TcpStream,
    addr: SocketAddr,
    socket_id: String,
    listen: &ListenConfig,
    limits: LimitsConfig,
    presence: PresenceHandle,
) {
    let mut upgrade_headers: Option<HeaderMap> = None;

    // Origin check for the WebSocket handshake
    let callback = |req: &Request, response: Response| {
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|o| o.to_str().ok());
        if !listen.origin_allowed(origin) {
            warn!(%addr, origin = origin.unwrap_or_default(), "WebSocket CORS rejected");
            let mut reject = ErrorResponse::new(Some("CORS origin not allowed".to_string()));
            *reject.status_mut() = StatusCode::FORBIDDEN;
            return Err(reject);
        }
        upgrade_headers = Some(req.headers().clone());
        Ok(response)
    };

    let ws_stream = match accept_hdr_async(stream, callback).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            warn!(%addr, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let admission = match upgrade_headers {
        Some(headers) => gate::admit(&headers),
        None => Err(gate::unseen()),
    };

    let connection = Connection::new(socket_id, addr, ws_stream, presence, limits);
    if let Err(e) = connection.run(admission).await {
        warn!(%addr, error = %e, "Connection error");
    }
    debug!(%addr, "WebSocket connection closed");
}
