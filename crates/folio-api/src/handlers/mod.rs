//! HTTP request handlers organized by domain.

pub mod health;
pub mod presence;
pub mod upstream;
