//! Password hashing using bcrypt

use crate::core::error::{AdminError, Result};

/// Hash a password using bcrypt with the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AdminError::HashError(format!("Failed to hash password: {}", e)))
}
