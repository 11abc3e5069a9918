//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request timeouts
//! - Health check endpoint
//! - CORS support

use crate::core::Config;
use crate::core::config::ServerConfig;
use crate::core::error::ErrorResponse;
use crate::core::services::{FlightService, UserService};
use crate::api::middleware::trace_id_middleware;
use crate::api::routes::build_api_routes;
use crate::api::handlers::{health_check, AppState};
use crate::db::manager::DatabaseManager;
use crate::db::repository::{FlightRepository, UserRepository};
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    BoxError,
    Json,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let server_config = config.server.clone();

        let router = Self::build_router(&config, db)?;

        Ok(Self {
            router,
            config: server_config,
        })
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(config: &Config, db: Arc<DatabaseManager>) -> anyhow::Result<Router> {
        // Create repositories
        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let flight_repo = Arc::new(FlightRepository::new(db));

        // Create services
        let user_service = Arc::new(UserService::new(user_repo.clone(), config.security.bcrypt_cost));
        let flight_service = Arc::new(FlightService::new(flight_repo, user_repo));

        let request_timeout = Duration::from_secs(config.server.request_timeout);
        let cors = Self::build_cors_layer(&config.security.allowed_origins);

        let app_state = AppState {
            user_service,
            flight_service,
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .merge(build_api_routes(app_state))
            .layer(
                ServiceBuilder::new()
                    // Add trace ID middleware for request tracking
                    .layer(middleware::from_fn(trace_id_middleware))
                    // Add tracing for all requests
                    .layer(TraceLayer::new_for_http())
                    // Add CORS support
                    .layer(cors)
                    // Turn a timeout into a regular error response
                    .layer(HandleErrorLayer::new(handle_timeout_error))
                    .layer(TimeoutLayer::new(request_timeout)),
            );

        Ok(router)
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        // If allowed_origins contains "*", allow any origin
        if allowed_origins.iter().any(|origin| origin == "*") {
            cors.allow_origin(Any)
        } else {
            let origins: Vec<_> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins)
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            "Starting HTTP server"
        );

        // Create TCP listener
        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        // Serve with graceful shutdown
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

async fn handle_timeout_error(err: BoxError) -> impl IntoResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request timed out");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new("Timeout".to_string(), "Request timed out".to_string())),
        )
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                "InternalError".to_string(),
                "Internal server error".to_string(),
            )),
        )
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
