//! # folio-presence
//!
//! Live presence feed for Folio. Provides:
//!
//! - A long-lived client for the Lanyard presence gateway
//!   (subscribe handshake, server-paced heartbeats, fixed-delay reconnect)
//! - Typed gateway frames validated at the parse boundary
//! - An ordered observer registry that always hands late subscribers the
//!   latest snapshot
//!
//! Exactly one [`PresenceClient`] is meant to exist per process; the
//! composition root creates it and shares the handle.

pub mod client;
pub mod connection;
pub mod error;
pub mod message;
pub mod observer;
pub mod presence;

pub use client::PresenceClient;
pub use connection::transport::{GatewayConnection, GatewayConnector, TransportEvent};
pub use connection::tungstenite::TungsteniteConnector;
pub use error::{PresenceError, PresenceResult};
pub use observer::Subscription;
pub use presence::snapshot::PresenceSnapshot;
pub use presence::state::{ConnectionState, PresenceState};
pub use presence::status::PresenceStatus;
