//! WebSocket transport backed by `tokio-tungstenite`.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use super::transport::{GatewayConnection, GatewayConnector, TransportEvent};
use crate::error::{PresenceError, PresenceResult};

/// Opens real `ws://` / `wss://` connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl GatewayConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> PresenceResult<Box<dyn GatewayConnection>> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| PresenceError::Transport(e.to_string()))?;
        debug!(url, status = %response.status(), "WebSocket handshake complete");
        Ok(Box::new(TungsteniteConnection { stream }))
    }
}

struct TungsteniteConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl GatewayConnection for TungsteniteConnection {
    async fn send_text(&mut self, text: String) -> PresenceResult<()> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| PresenceError::Transport(e.to_string()))
    }

    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return TransportEvent::Message(text.to_string()),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return TransportEvent::Message(text),
                    Err(_) => debug!(len = bytes.len(), "Skipping non-UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Gateway sent close frame");
                    return TransportEvent::Closed;
                }
                // Ping/pong are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return TransportEvent::Error(e.to_string()),
                None => return TransportEvent::Closed,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "WebSocket close failed");
        }
    }
}
