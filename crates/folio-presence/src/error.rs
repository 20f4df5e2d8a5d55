//! Presence client error types.

use thiserror::Error;

/// Errors raised inside the presence client.
///
/// None of these reach observers; they are logged and reflected only as a
/// [`ConnectionState`](crate::presence::state::ConnectionState) change.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// The socket could not be opened, or failed while open.
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// An inbound frame was not JSON or did not have the expected shape.
    #[error("Malformed gateway frame: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for presence operations.
pub type PresenceResult<T> = Result<T, PresenceError>;
