//! Discord status definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discord online status of the tracked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceStatus {
    /// Connected and active.
    Online,
    /// Connected but idle.
    Idle,
    /// Do not disturb.
    DoNotDisturb,
    /// Not connected, invisible, or unknown.
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Parses from a string with an offline fallback.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" | "do_not_disturb" => Self::DoNotDisturb,
            _ => Self::Offline,
        }
    }

    /// Converts to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::DoNotDisturb => "dnd",
            Self::Offline => "offline",
        }
    }
}

impl Serialize for PresenceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PresenceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Self::from_str_or_default)
            .unwrap_or_default())
    }
}
