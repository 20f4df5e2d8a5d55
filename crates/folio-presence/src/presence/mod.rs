//! Presence data: Discord status, the remote snapshot, and the client state.

pub mod snapshot;
pub mod state;
pub mod status;
