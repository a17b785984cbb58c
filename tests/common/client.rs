//! Test presence client.
//!
//! A WebSocket client that sends inbound events and asserts on the
//! outbound events the server pushes back.

use futures_util::{SinkExt, StreamExt};
use presence_proto::{Frame, InboundEvent, OutboundEvent};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// A test presence client.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect with exactly the given upgrade headers.
    pub async fn connect(address: &str, headers: &[(&'static str, &str)]) -> anyhow::Result<Self> {
        let mut request = format!("ws://{address}/").into_client_request()?;
        for (name, value) in headers {
            request.headers_mut().insert(*name, HeaderValue::from_str(value)?);
        }
        let (ws, _response) = connect_async(request).await?;
        Ok(Self { ws })
    }

    /// Connect with all four identity headers.
    pub async fn connect_as(address: &str, subject: &str, role: &str) -> anyhow::Result<Self> {
        let email = format!("{subject}@example.com");
        Self::connect(
            address,
            &[
                ("x-user-sub", subject),
                ("x-user-name", subject),
                ("x-user-email", email.as_str()),
                ("x-user-type", role),
            ],
        )
        .await
    }

    /// Send an inbound event.
    pub async fn send(&mut self, event: InboundEvent) -> anyhow::Result<()> {
        let text = event.into_frame()?.encode()?;
        self.send_raw(&text).await
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Receive a single event from the server.
    pub async fn recv(&mut self) -> anyhow::Result<OutboundEvent> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive an event with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<OutboundEvent> {
        loop {
            let msg = timeout(dur, self.ws.next())
                .await?
                .ok_or_else(|| anyhow::anyhow!("Connection closed"))??;
            match msg {
                Message::Text(text) => {
                    let frame: Frame = text.parse()?;
                    return Ok(OutboundEvent::try_from(frame)?);
                }
                Message::Close(frame) => anyhow::bail!("Connection closed: {:?}", frame),
                _ => continue,
            }
        }
    }

    /// Assert that no event arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) {
        if let Ok(event) = self.recv_timeout(dur).await {
            panic!("Expected no event, got {:?}", event);
        }
    }

    /// Wait for the server to close the connection, returning its close frame.
    pub async fn recv_close(&mut self) -> anyhow::Result<Option<CloseFrame<'static>>> {
        loop {
            match timeout(Duration::from_secs(5), self.ws.next()).await? {
                Some(Ok(Message::Close(frame))) => return Ok(frame),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(None),
            }
        }
    }

    /// Close the connection from the client side.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
