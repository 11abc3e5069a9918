use super::{AppState, JsonBody};
use crate::api::models::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, UserActionResponse, UserResponse,
    UserSearchQuery,
};
use crate::core::error::Result;
use crate::db::models::{Role, User};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn to_responses(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// Handler for POST /api/users - Create a user
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Handler for GET /api/users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(to_responses(state.user_service.list_users().await?))
}

/// Handler for GET /api/users/search - Filter by name, surname, email and role
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<impl IntoResponse> {
    Ok(to_responses(state.user_service.search_users(query).await?))
}

/// Handler for GET /api/users/pilotos
pub async fn list_pilots(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(to_responses(state.user_service.users_by_role(Role::Pilot.as_str()).await?))
}

/// Handler for GET /api/users/azafatas
pub async fn list_flight_attendants(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(to_responses(
        state.user_service.users_by_role(Role::FlightAttendant.as_str()).await?,
    ))
}

/// Handler for GET /api/users/role/:rol
pub async fn users_by_role(
    State(state): State<AppState>,
    Path(rol): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(to_responses(state.user_service.users_by_role(&rol).await?))
}

/// Handler for GET /api/users/:userId
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Handler for PUT/PATCH /api/users/:userId - Sparse update
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update_user(&user_id, req).await?;

    Ok(Json(UserActionResponse {
        message: "User updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Handler for DELETE /api/users/:userId
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.delete_user(&user_id).await?;

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
        user_email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::test_support::{app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    fn ana() -> Value {
        json!({
            "nombre": "Ana",
            "apellido": "Peña",
            "email": "ana@example.com",
            "password": "secret",
            "telefono": "555-0100",
            "direccion": "Av. Reforma 1",
            "rol": "Piloto"
        })
    }

    #[tokio::test]
    async fn test_create_user_hides_password() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/users", Some(ana())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["rol"], "Piloto");
        assert_eq!(body["pasaporte"], "ana_peña_pasaporte.png");
        assert!(body["_id"].is_string());
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_user_missing_fields_is_400_with_list() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/users", Some(json!({"nombre": "Ana"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["details"]["messages"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_409_and_adds_nothing() {
        let app = app();
        send(&app, Method::POST, "/api/users", Some(ana())).await;

        let mut again = ana();
        again["email"] = json!("ANA@example.com");
        let (status, _) = send(&app, Method::POST, "/api/users", Some(again)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, users) = send(&app, Method::GET, "/api/users", None).await;
        assert_eq!(users.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_role_routes() {
        let app = app();
        send(&app, Method::POST, "/api/users", Some(ana())).await;
        send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({
                "nombre": "Luis",
                "apellido": "Ruiz",
                "email": "luis@example.com",
                "password": "secret",
                "telefono": "555-0101",
                "direccion": "Calle 2",
                "rol": "Azafata"
            })),
        )
        .await;

        let (status, found) = send(&app, Method::GET, "/api/users/search?apellido=PE%C3%91A", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["nombre"], "Ana");

        let (_, pilots) = send(&app, Method::GET, "/api/users/pilotos", None).await;
        assert_eq!(pilots.as_array().unwrap().len(), 1);

        let (_, attendants) = send(&app, Method::GET, "/api/users/azafatas", None).await;
        assert_eq!(attendants[0]["nombre"], "Luis");

        let (_, admins) = send(&app, Method::GET, "/api/users/role/Admin", None).await;
        assert!(admins.as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::GET, "/api/users/role/Capitan", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, empty_search) = send(&app, Method::GET, "/api/users/search", None).await;
        assert_eq!(empty_search.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_user_checks_id() {
        let app = app();

        let (status, _) = send(&app, Method::GET, "/api/users/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = format!("/api/users/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, Method::GET, &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_returns_message_and_user() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/users", Some(ana())).await;
        let uri = format!("/api/users/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"telefono": "555-9999"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["telefono"], "555-9999");
        assert_eq!(body["user"]["nombre"], "Ana");
        assert!(body["user"].get("password").is_none());

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"nombre": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_email_collision_is_409() {
        let app = app();
        send(&app, Method::POST, "/api/users", Some(ana())).await;
        let mut luis = ana();
        luis["email"] = json!("luis@example.com");
        let (_, created) = send(&app, Method::POST, "/api/users", Some(luis)).await;
        let uri = format!("/api/users/{}", created["_id"].as_str().unwrap());

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"email": "ana@example.com"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, stored) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(stored["email"], "luis@example.com");
    }

    #[tokio::test]
    async fn test_delete_reports_email_then_404() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/users", Some(ana())).await;
        let uri = format!("/api/users/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userEmail"], "ana@example.com");
        assert_eq!(body["message"], "User deleted successfully");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/users", Some(json!(["not", "an", "object"]))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRequest");

        let (status, body) = send(&app, Method::POST, "/api/users", Some(json!({"nombre": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRequest");

        let (_, users) = send(&app, Method::GET, "/api/users", None).await;
        assert!(users.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_routes_match_wire_names_exactly() {
        let app = app();
        send(&app, Method::POST, "/api/users", Some(ana())).await;

        let (status, pilots) = send(&app, Method::GET, "/api/users/role/Piloto", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pilots.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, "/api/users/role/piloto", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/api/users/search?rol=PILOTO", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
