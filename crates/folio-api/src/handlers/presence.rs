//! Live presence snapshot.

use axum::Json;
use axum::extract::State;

use folio_presence::PresenceState;

use crate::state::AppState;

/// GET /api/presence
///
/// `{ status, connection_status, data }`; offline and disconnected when the
/// presence feed is disabled.
pub async fn presence(State(state): State<AppState>) -> Json<PresenceState> {
    Json(
        state
            .presence
            .as_ref()
            .map(|client| client.current())
            .unwrap_or_default(),
    )
}
