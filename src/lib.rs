//! Trello CLI Library
//!
//! Exposes the Trello REST API as scriptable commands. Every command produces
//! exactly one JSON result envelope with a stable error-code taxonomy, so
//! scripts and agents can branch on `ok` and `errorCode` instead of parsing
//! prose.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
