//! # folio-cache
//!
//! Response caching for Folio's API routes. Each route owns exactly one
//! slot holding its last successful payload:
//!
//! - within the route's window the payload is served without an upstream call
//! - after the window the upstream is called again and the slot replaced
//! - when that call fails, the previous payload is served regardless of age
//!
//! The cache lives for the lifetime of the process and is never persisted.

pub mod response;
pub mod source;

pub use response::{Freshness, ResponseCache, Served};
pub use source::CachedUpstream;
