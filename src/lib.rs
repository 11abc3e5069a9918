//! Flight Admin Backend Library
//!
//! This library provides the REST API for managing users and flights, the
//! SQLite-backed store behind it, and a UI-independent client for the flight
//! administration screen.

pub mod api;
pub mod auth;
pub mod client;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use client::{FlightAdminState, FlightDraft, HttpFlightApi};
pub use crate::core::{AdminError, Config};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;
