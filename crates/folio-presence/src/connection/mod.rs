//! Gateway connection plumbing: transport seam, WebSocket implementation, timers.

pub mod heartbeat;
pub mod timer;
pub mod transport;
pub mod tungstenite;

pub use heartbeat::Heartbeat;
pub use timer::Timer;
