//! # folio-api
//!
//! HTTP API layer for Folio built on Axum.
//!
//! Serves the cached upstream routes the site consumes, the live presence
//! snapshot, and a health probe, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
