//! Flight administration client
//!
//! UI-independent state for the flight admin screen and the HTTP client it
//! drives. A front end renders [`FlightAdminState`] and forwards user actions
//! to its methods.

pub mod api;
pub mod draft;
pub mod state;

pub use api::{ClientError, FlightApi, HttpFlightApi};
pub use draft::FlightDraft;
pub use state::{Banner, BannerKind, Confirm, FlightAdminState, Outcome};
