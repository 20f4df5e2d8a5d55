//! Routes backed by upstream services.
//!
//! Cached routes answer from their last success while it is fresh, and keep
//! answering from it when the upstream fails. The `x-cache` header tells
//! which of the two happened.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use folio_cache::Served;
use folio_core::traits::upstream::Upstream;

use crate::error::ApiError;
use crate::state::AppState;

pub const GITHUB_FAILURE: &str = "Failed to fetch GitHub data. Possible Ratelimit try again later.";
pub const MUSIC_FAILURE: &str = "Failed to fetch music stats";
pub const WEATHER_FAILURE: &str = "Unable to fetch weather data";
pub const SONGS_FAILURE: &str = "Failed to load songs";

/// `x-cache` response header name.
pub const CACHE_HEADER: &str = "x-cache";

fn cached_json<T: Serialize>(served: Served<T>) -> Response {
    let mut response = Json(served.value).into_response();
    response.headers_mut().insert(
        CACHE_HEADER,
        HeaderValue::from_static(served.freshness.as_str()),
    );
    response
}

/// GET /api/projects
pub async fn projects(State(state): State<AppState>) -> Result<Response, ApiError> {
    let served = state
        .projects
        .get()
        .await
        .map_err(|e| ApiError::upstream(e, GITHUB_FAILURE))?;
    Ok(cached_json(served))
}

/// GET /api/stats
pub async fn github_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let served = state
        .github_stats
        .get()
        .await
        .map_err(|e| ApiError::upstream(e, GITHUB_FAILURE))?;
    Ok(cached_json(served))
}

/// GET /api/music
pub async fn music_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let served = state
        .music_stats
        .get()
        .await
        .map_err(|e| ApiError::upstream(e, MUSIC_FAILURE))?;
    Ok(cached_json(served))
}

/// GET /api/weather
pub async fn weather(State(state): State<AppState>) -> Result<Response, ApiError> {
    let served = state
        .weather
        .get()
        .await
        .map_err(|e| ApiError::upstream(e, WEATHER_FAILURE))?;
    Ok(cached_json(served))
}

/// GET /api/songs
pub async fn songs(State(state): State<AppState>) -> Result<Response, ApiError> {
    let songs = state
        .songs
        .fetch()
        .await
        .map_err(|e| ApiError::upstream(e, SONGS_FAILURE))?;
    Ok(Json(songs).into_response())
}
