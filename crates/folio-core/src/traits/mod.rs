//! Core trait definitions shared across Folio crates.

pub mod upstream;

pub use upstream::Upstream;
