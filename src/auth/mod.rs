//! Authentication support
//!
//! Only credential storage lives here: user passwords are bcrypt-hashed before
//! they reach the database and never leave it.

pub mod password;

pub use password::hash_password;
