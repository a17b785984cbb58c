//! Per-connection task.
//!
//! Each admitted connection runs one task that multiplexes two streams:
//! frames read from the client, decoded and forwarded to the presence
//! actor, and encoded frames queued by the actor, written to the client.

use crate::config::LimitsConfig;
use crate::error::{ConnectionError, GateError};
use crate::state::actor::Outbound;
use crate::state::{PresenceHandle, SocketId};
use futures_util::{SinkExt, StreamExt};
use presence_proto::{Frame, HandshakeIdentity, InboundEvent};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, info, warn};

/// A client connection handler.
pub struct Connection {
    socket_id: SocketId,
    addr: SocketAddr,
    stream: WebSocketStream<TcpStream>,
    presence: PresenceHandle,
    limits: LimitsConfig,
}

impl Connection {
    pub fn new(
        socket_id: SocketId,
        addr: SocketAddr,
        stream: WebSocketStream<TcpStream>,
        presence: PresenceHandle,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            socket_id,
            addr,
            stream,
            presence,
            limits,
        }
    }

    /// Run the connection until either side closes it.
    pub async fn run(
        self,
        admission: Result<HandshakeIdentity, GateError>,
    ) -> Result<(), ConnectionError> {
        let identity = match admission {
            Ok(identity) => identity,
            Err(e) => return self.reject(e).await,
        };

        let (outbound_tx, outbound_rx) = mpsc::channel(self.limits.outbound_queue);
        self.presence
            .attach(self.socket_id.clone(), identity, outbound_tx)
            .await?;
        info!(addr = %self.addr, "Connection admitted");

        let presence = self.presence.clone();
        let socket_id = self.socket_id.clone();
        let result = self.event_loop(outbound_rx).await;

        // The actor must forget this socket whatever ended the loop.
        presence.disconnected(socket_id).await?;
        result
    }

    async fn reject(mut self, error: GateError) -> Result<(), ConnectionError> {
        warn!(addr = %self.addr, %error, "Connection rejected");
        crate::metrics::record_rejected_connection();
        let frame = CloseFrame {
            code: CloseCode::Policy,
            reason: error.to_string().into(),
        };
        if let Err(e) = self.stream.close(Some(frame)).await {
            debug!(error = %e, "Close after rejection failed");
        }
        Ok(())
    }

    async fn event_loop(
        self,
        mut outbound_rx: mpsc::Receiver<Outbound>,
    ) -> Result<(), ConnectionError> {
        let (mut sink, mut source) = self.stream.split();

        loop {
            tokio::select! {
                incoming = source.next() => match incoming {
                    Some(Ok(msg @ Message::Text(_))) => {
                        if msg.len() > self.limits.max_frame_bytes {
                            warn!(bytes = msg.len(), "Inbound frame too large, ignored");
                            continue;
                        }
                        if let Some(event) = decode(msg) {
                            self.presence.inbound(self.socket_id.clone(), event).await?;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "Client closed connection");
                        return Ok(());
                    }
                    Some(Ok(Message::Binary(_))) => {
                        debug!("Binary frame ignored");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
                outbound = outbound_rx.recv() => match outbound {
                    Some(text) => sink.send(Message::Text(text.to_string())).await?,
                    None => return Ok(()),
                },
            }
        }
    }
}

/// Decode an inbound text frame; undecodable frames are logged and skipped.
fn decode(msg: Message) -> Option<InboundEvent> {
    match Frame::try_from(msg).and_then(InboundEvent::try_from) {
        Ok(event) => Some(event),
        Err(e) => {
            debug!(error = %e, "Ignoring inbound frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Message {
        Message::Text(s.to_string())
    }

    #[test]
    fn decodes_known_event() {
        let event = decode(text(r#"{"event":"client-emit-user-joined","data":{"type":"user","uid":"u1"}}"#));
        assert!(matches!(event, Some(InboundEvent::UserJoined(_))));
    }

    #[test]
    fn skips_unknown_and_garbage() {
        assert!(decode(text(r#"{"event":"client-emit-dance","data":{}}"#)).is_none());
        assert!(decode(text("not json")).is_none());
        assert!(decode(text(r#"{"event":"client-emit-user-joined-an-area"}"#)).is_none());
        assert!(decode(Message::Binary(b"{}".to_vec())).is_none());
    }
}
