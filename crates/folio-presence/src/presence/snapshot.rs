//! The presence payload pushed by the gateway.
//!
//! Field names follow the gateway's JSON so a snapshot serializes back out
//! in the same shape the site frontend already consumes. Only the fields the
//! site reads are typed; everything else on an activity is kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::PresenceStatus;

/// A full presence snapshot. Each update replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    /// The Discord account.
    #[serde(rename = "discord_user")]
    pub user: UserInfo,
    /// Online status.
    #[serde(rename = "discord_status", default)]
    pub status: PresenceStatus,
    /// Current activities, in the order Discord reports them.
    #[serde(default)]
    pub activities: Vec<ActivityInfo>,
    /// Currently playing Spotify track, if any.
    #[serde(default)]
    pub spotify: Option<SpotifyInfo>,
    /// Whether `spotify` is populated.
    #[serde(default)]
    pub listening_to_spotify: bool,
    /// Active on the desktop client.
    #[serde(default)]
    pub active_on_discord_desktop: bool,
    /// Active on the mobile client.
    #[serde(default)]
    pub active_on_discord_mobile: bool,
    /// Active on the web client.
    #[serde(default)]
    pub active_on_discord_web: bool,
}

/// Discord account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Snowflake id.
    pub id: String,
    /// Unique username.
    pub username: String,
    /// Display name.
    pub global_name: Option<String>,
    /// Legacy discriminator (`"0"` for migrated accounts).
    pub discriminator: Option<String>,
    /// Avatar hash.
    pub avatar: Option<String>,
    pub avatar_decoration_data: Option<AvatarDecoration>,
    /// Server tag shown next to the name.
    pub clan: Option<GuildTag>,
    pub primary_guild: Option<GuildTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDecoration {
    pub asset: String,
    pub sku_id: Option<String>,
    pub expires_at: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildTag {
    pub tag: Option<String>,
    pub badge: Option<String>,
    pub identity_guild_id: Option<Value>,
    pub identity_enabled: Option<bool>,
}

/// One Discord activity (game, editor, custom status, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInfo {
    #[serde(default)]
    pub name: String,
    /// Discord activity type (0 playing, 2 listening, 4 custom, ...).
    #[serde(rename = "type", default)]
    pub kind: u8,
    pub state: Option<String>,
    pub details: Option<String>,
    pub application_id: Option<String>,
    pub timestamps: Option<Timestamps>,
    pub assets: Option<ActivityAssets>,
    /// Fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Start/end of an activity, in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAssets {
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
}

/// The Spotify track being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyInfo {
    pub track_id: Option<String>,
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    pub album_art_url: Option<String>,
    pub timestamps: Option<Timestamps>,
}
