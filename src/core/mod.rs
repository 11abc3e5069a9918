//! Core business logic module
//!
//! This module provides the core application layer including:
//! - Business logic services for users and flights
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Sparse patch fields and flight filtering

pub mod services;
pub mod config;
pub mod logging;
pub mod error;
pub mod patch;
pub mod filter;

pub use services::{FlightService, UserService};
pub use config::Config;
pub use logging::Logger;
pub use error::{AdminError, ErrorResponse, Result, ErrorContext};
pub use patch::Patch;
pub use filter::{filter_flights, Scheduled};
