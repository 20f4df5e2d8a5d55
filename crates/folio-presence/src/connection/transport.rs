//! Transport seam between the presence client and the socket.
//!
//! The client only needs "open", "send text", "next event", and "close";
//! tests substitute a scripted implementation.

use async_trait::async_trait;

use crate::error::PresenceResult;

/// Something that happened on an open connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame.
    Message(String),
    /// The peer closed the connection, or the stream ended.
    Closed,
    /// The connection failed.
    Error(String),
}

/// Opens gateway connections.
#[async_trait]
pub trait GatewayConnector: Send + Sync + 'static {
    /// Open a connection to `url`.
    async fn connect(&self, url: &str) -> PresenceResult<Box<dyn GatewayConnection>>;
}

/// One open gateway connection.
#[async_trait]
pub trait GatewayConnection: Send {
    /// Send a text frame.
    async fn send_text(&mut self, text: String) -> PresenceResult<()>;

    /// Wait for the next event. Must be cancel-safe.
    async fn next_event(&mut self) -> TransportEvent;

    /// Close the connection. Errors are swallowed.
    async fn close(&mut self);
}
