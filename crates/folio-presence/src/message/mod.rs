//! Gateway wire frames.

pub mod types;

pub use types::{DispatchKind, GatewayFrame, OutboundFrame};
