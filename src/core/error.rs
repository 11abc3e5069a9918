//! Error type system for the flight admin backend
//!
//! This module provides:
//! - A single error enum covering validation, conflict, lookup and store failures
//! - HTTP status code mapping
//! - JSON error responses carrying a trace ID
//!
//! Internal failures never leak their details to the client; they are logged
//! and replaced by a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the flight admin system
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Password hashing failed: {0}")]
    HashError(String),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed: {}", .0.join("; "))]
    InvalidFields(Vec<String>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AdminError::InvalidRequest(_)
            | AdminError::InvalidId(_)
            | AdminError::ValidationError(_)
            | AdminError::InvalidFields(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AdminError::Conflict(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AdminError::InitializationError(_)
            | AdminError::ConfigError(_)
            | AdminError::DatabaseError(_)
            | AdminError::HashError(_)
            | AdminError::TaskError(_)
            | AdminError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AdminError::InitializationError(_) => "InitializationError",
            AdminError::ConfigError(_) => "ConfigError",
            AdminError::DatabaseError(_) => "DatabaseError",
            AdminError::HashError(_) => "HashError",
            AdminError::TaskError(_) => "TaskError",
            AdminError::IoError(_) => "IoError",
            AdminError::InvalidRequest(_) => "InvalidRequest",
            AdminError::InvalidId(_) => "InvalidId",
            AdminError::ValidationError(_) | AdminError::InvalidFields(_) => "ValidationError",
            AdminError::NotFound(_) => "NotFound",
            AdminError::Conflict(_) => "Conflict",
        }
    }

    /// Whether the error is the server's fault rather than the caller's
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to API clients
    ///
    /// Client errors carry their own message; internal errors are replaced by a
    /// generic one.
    pub fn public_message(&self) -> String {
        match self {
            AdminError::InvalidRequest(msg)
            | AdminError::InvalidId(msg)
            | AdminError::ValidationError(msg)
            | AdminError::NotFound(msg)
            | AdminError::Conflict(msg) => msg.clone(),
            AdminError::InvalidFields(messages) => messages.join("; "),
            _ => "Internal server error".to_string(),
        }
    }

    /// Translate a SQLite UNIQUE violation into a conflict, keep anything else
    pub fn from_unique_violation(err: rusqlite::Error, conflict_message: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                AdminError::Conflict(conflict_message.to_string())
            }
            _ => AdminError::DatabaseError(err),
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            details: None,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from an AdminError
    pub fn from_error(error: &AdminError) -> Self {
        let mut response = Self::new(error.error_type().to_string(), error.public_message());
        if let AdminError::InvalidFields(messages) = error {
            response.details = Some(serde_json::json!({ "messages": messages }));
        }
        response
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (trace_id: {})", self.error, self.message, self.trace_id)
    }
}

/// Implement IntoResponse so handlers can return `Result<_, AdminError>` directly
impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if self.is_internal() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with AdminError
pub type Result<T> = std::result::Result<T, AdminError>;

/// Context extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AdminError::InitializationError(format!("{}: {}", context.into(), e)))
    }
}
