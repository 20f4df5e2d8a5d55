//! # folio-core
//!
//! Core crate for Folio, the backend behind the profile site. Contains the
//! configuration schemas, the unified error system, and the `Upstream`
//! trait implemented by every remote data source.
//!
//! This crate has **no** internal dependencies on other Folio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
