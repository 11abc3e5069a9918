pub mod users;
pub mod flights;

pub use users::*;
pub use flights::*;

use crate::api::models::HealthResponse;
use crate::core::error::AdminError;
use crate::core::services::{FlightService, UserService};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub flight_service: Arc<FlightService>,
}

/// JSON request body whose rejections are reported as `AdminError`
///
/// Malformed JSON, a body that isn't a JSON object, or a value of the wrong
/// type becomes a 400 with the standard error body instead of axum's
/// plain-text 422.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AdminError::InvalidRequest(rejection.body_text()))?;

        // serde would otherwise fill a struct positionally from an array
        if !value.is_object() {
            return Err(AdminError::InvalidRequest(
                "Request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map(Self)
            .map_err(|e| AdminError::InvalidRequest(format!("Invalid request body: {}", e)))
    }
}

/// Handler for GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
