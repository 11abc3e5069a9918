//! HTTP access to the flight admin API
//!
//! [`FlightApi`] is the seam between the admin screen state and the network;
//! [`HttpFlightApi`] implements it with `reqwest`.

use crate::api::models::{
    CreateFlightRequest, FlightActionResponse, FlightResponse, UpdateFlightRequest, UserResponse,
};
use crate::core::config::ClientConfig;
use crate::core::error::ErrorResponse;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure talking to the API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Could not reach the server: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// The form was rejected before anything was sent
    #[error("{}", .0.join("; "))]
    InvalidForm(Vec<String>),
}

impl ClientError {
    /// Message suitable for the screen's banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Operations the flight admin screen needs from the backend
#[async_trait]
pub trait FlightApi: Send + Sync {
    async fn list_flights(&self) -> Result<Vec<FlightResponse>, ClientError>;

    async fn list_pilots(&self) -> Result<Vec<UserResponse>, ClientError>;

    async fn list_flight_attendants(&self) -> Result<Vec<UserResponse>, ClientError>;

    async fn create_flight(&self, request: &CreateFlightRequest) -> Result<FlightActionResponse, ClientError>;

    async fn update_flight(
        &self,
        id: &str,
        request: &UpdateFlightRequest,
    ) -> Result<FlightActionResponse, ClientError>;

    async fn delete_flight(&self, id: &str) -> Result<FlightActionResponse, ClientError>;
}

/// [`FlightApi`] over HTTP
#[derive(Clone)]
pub struct HttpFlightApi {
    client: Client,
    base_url: Url,
}

impl HttpFlightApi {
    /// Client for the API rooted at `base_url`, e.g. `http://127.0.0.1:4000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url)
    }

    /// Absolute URL for a path relative to the API root
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|error| error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });

            tracing::warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FlightApi for HttpFlightApi {
    async fn list_flights(&self) -> Result<Vec<FlightResponse>, ClientError> {
        let url = self.endpoint("api/vuelos")?;
        self.send(self.client.get(url)).await
    }

    async fn list_pilots(&self) -> Result<Vec<UserResponse>, ClientError> {
        let url = self.endpoint("api/users/pilotos")?;
        self.send(self.client.get(url)).await
    }

    async fn list_flight_attendants(&self) -> Result<Vec<UserResponse>, ClientError> {
        let url = self.endpoint("api/users/azafatas")?;
        self.send(self.client.get(url)).await
    }

    async fn create_flight(&self, request: &CreateFlightRequest) -> Result<FlightActionResponse, ClientError> {
        let url = self.endpoint("api/vuelos")?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn update_flight(
        &self,
        id: &str,
        request: &UpdateFlightRequest,
    ) -> Result<FlightActionResponse, ClientError> {
        let url = self.endpoint(&format!("api/vuelos/{}", id))?;
        self.send(self.client.put(url).json(request)).await
    }

    async fn delete_flight(&self, id: &str) -> Result<FlightActionResponse, ClientError> {
        let url = self.endpoint(&format!("api/vuelos/{}", id))?;
        self.send(self.client.delete(url)).await
    }
}
