//! API routes

use crate::api::handlers::{
    // User management
    create_user, delete_user, get_user, list_flight_attendants, list_pilots, list_users,
    search_users, update_user, users_by_role,
    // Flight management
    create_flight, delete_flight, get_flight, list_flights, update_flight,
    AppState,
};
use axum::{
    routing::get,
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/search", get(search_users))
        .route("/api/users/pilotos", get(list_pilots))
        .route("/api/users/azafatas", get(list_flight_attendants))
        .route("/api/users/role/:rol", get(users_by_role))
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).patch(update_user).delete(delete_user),
        );

    let flight_routes = Router::new()
        .route("/api/vuelos", get(list_flights).post(create_flight))
        .route(
            "/api/vuelos/:id",
            get(get_flight).put(update_flight).patch(update_flight).delete(delete_flight),
        );

    Router::new()
        .merge(user_routes)
        .merge(flight_routes)
        .with_state(state)
}
