//! The client's observable state.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::snapshot::PresenceSnapshot;
use super::status::PresenceStatus;

/// Connection lifecycle of the presence client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// A socket is being opened.
    Connecting,
    /// The socket is open and subscribed.
    Connected,
    /// No socket; a reconnect may be pending.
    #[default]
    Disconnected,
}

impl ConnectionState {
    /// Converts to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// What observers see: the connection state plus the last snapshot.
///
/// The snapshot survives disconnects; it is only ever replaced by a newer
/// one, never cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceState {
    pub connection: ConnectionState,
    pub presence: Option<Arc<PresenceSnapshot>>,
}

impl PresenceState {
    /// Discord status of the last snapshot, offline when none arrived yet.
    pub fn status(&self) -> PresenceStatus {
        self.presence
            .as_ref()
            .map(|p| p.status)
            .unwrap_or_default()
    }

    pub(crate) fn with_connection(&self, connection: ConnectionState) -> Self {
        Self {
            connection,
            presence: self.presence.clone(),
        }
    }

    pub(crate) fn with_presence(&self, presence: PresenceSnapshot) -> Self {
        Self {
            connection: self.connection,
            presence: Some(Arc::new(presence)),
        }
    }
}

/// Serializes as `{status, connection_status, data}`.
impl Serialize for PresenceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PresenceState", 3)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("connection_status", &self.connection)?;
        state.serialize_field("data", &self.presence.as_deref())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_serializes_offline() {
        let value = serde_json::to_value(PresenceState::default()).unwrap();
        assert_eq!(
            value,
            json!({ "status": "offline", "connection_status": "disconnected", "data": null })
        );
    }

    #[test]
    fn test_connection_change_keeps_snapshot() {
        let snapshot: PresenceSnapshot = serde_json::from_value(json!({
            "discord_user": { "id": "1", "username": "u" },
            "discord_status": "dnd"
        }))
        .unwrap();
        let state = PresenceState::default()
            .with_connection(ConnectionState::Connected)
            .with_presence(snapshot);
        let dropped = state.with_connection(ConnectionState::Disconnected);

        assert_eq!(dropped.presence, state.presence);
        assert_eq!(dropped.status(), PresenceStatus::DoNotDisturb);
    }
}
