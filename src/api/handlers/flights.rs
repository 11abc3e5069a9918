use super::{AppState, JsonBody};
use crate::api::models::{
    CreateFlightRequest, FlightActionResponse, FlightQuery, FlightResponse, UpdateFlightRequest,
};
use crate::core::error::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Handler for GET /api/vuelos - List flights, optionally by destination and date
pub async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<impl IntoResponse> {
    let flights = state.flight_service.list_flights(query).await?;
    let flights: Vec<FlightResponse> = flights.into_iter().map(FlightResponse::from).collect();
    Ok(Json(flights))
}

/// Handler for GET /api/vuelos/:id
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let flight = state.flight_service.get_flight(&id).await?;
    Ok(Json(FlightResponse::from(flight)))
}

/// Handler for POST /api/vuelos
pub async fn create_flight(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateFlightRequest>,
) -> Result<impl IntoResponse> {
    let flight = state.flight_service.create_flight(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(FlightActionResponse {
            success: true,
            message: "Flight created successfully".to_string(),
            vuelo: Some(FlightResponse::from(flight)),
        }),
    ))
}

/// Handler for PUT/PATCH /api/vuelos/:id - Sparse update
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateFlightRequest>,
) -> Result<impl IntoResponse> {
    let flight = state.flight_service.update_flight(&id, req).await?;

    Ok(Json(FlightActionResponse {
        success: true,
        message: "Flight updated successfully".to_string(),
        vuelo: Some(FlightResponse::from(flight)),
    }))
}

/// Handler for DELETE /api/vuelos/:id
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.flight_service.delete_flight(&id).await?;

    Ok(Json(FlightActionResponse {
        success: true,
        message: "Flight deleted successfully".to_string(),
        vuelo: None,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::test_support::{app, send};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    fn flight(destino: &str, fecha: &str) -> Value {
        json!({
            "origen": "CDMX",
            "destino": destino,
            "fechaSalida": fecha,
            "fechaLlegada": fecha,
            "hora": "08:30",
            "costo": 1500,
            "asientosDisponibles": "180",
            "avion": "A320",
            "aerolinea": "Volaris",
            "estado": "",
            "piloto": "",
            "copiloto": "",
            "azafata1": "",
            "azafata2": "",
            "azafata3": ""
        })
    }

    async fn create_user(app: &Router, nombre: &str, rol: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/users",
            Some(json!({
                "nombre": nombre,
                "apellido": "Test",
                "email": format!("{}@example.com", nombre.to_lowercase()),
                "password": "secret",
                "telefono": "555-0100",
                "direccion": "Calle 1",
                "rol": rol
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["_id"].as_str().unwrap().to_string()
    }

    async fn create_flight(app: &Router, body: Value) -> Value {
        let (status, body) = send(app, Method::POST, "/api/vuelos", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["vuelo"].clone()
    }

    #[tokio::test]
    async fn test_create_flight_returns_success_envelope() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/vuelos", Some(flight("Cancún", "2025-06-20"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Flight created successfully");
        assert_eq!(body["vuelo"]["estado"], "programado");
        assert_eq!(body["vuelo"]["asientosDisponibles"], 180);
        assert_eq!(body["vuelo"]["piloto"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let app = app();
        let mut body = flight("Cancún", "2025-06-20");
        body["estado"] = json!("perdido");
        let (status, body) = send(&app, Method::POST, "/api/vuelos", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_create_flight_missing_fields() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/vuelos", Some(json!({"destino": "Cancún"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["messages"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_crew_role_is_checked() {
        let app = app();
        let attendant = create_user(&app, "Luis", "Azafata").await;

        let mut body = flight("Cancún", "2025-06-20");
        body["piloto"] = json!(attendant);

        let (status, body) = send(&app, Method::POST, "/api/vuelos", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("piloto"));
    }

    #[tokio::test]
    async fn test_cancun_filter_example() {
        let app = app();
        for (destino, fecha) in [("Cancún", "2025-06-20"), ("Monterrey", "2025-06-22")] {
            let mut body = flight(destino, fecha);
            body["estado"] = json!("programado");
            create_flight(&app, body).await;
        }

        let (status, found) = send(&app, Method::GET, "/api/vuelos?destino=can", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["destino"], "Cancún");

        let (_, found) = send(&app, Method::GET, "/api/vuelos?fecha=2025-06-22", None).await;
        assert_eq!(found[0]["destino"], "Monterrey");

        let (_, all) = send(&app, Method::GET, "/api/vuelos", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["destino"], "Cancún");
    }

    #[tokio::test]
    async fn test_sparse_update_and_crew_unassign() {
        let app = app();
        let pilot = create_user(&app, "Ana", "Piloto").await;
        let attendant = create_user(&app, "Luis", "Azafata").await;

        let mut body = flight("Cancún", "2025-06-20");
        body["estado"] = json!("programado");
        body["piloto"] = json!(pilot);
        body["azafata1"] = json!(attendant);
        let created = create_flight(&app, body).await;
        let uri = format!("/api/vuelos/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"estado": "retrasado"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let updated = &body["vuelo"];
        assert_eq!(updated["estado"], "retrasado");
        assert_eq!(updated["destino"], "Cancún");
        assert_eq!(updated["piloto"], json!(pilot));

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"piloto": ""}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vuelo"]["piloto"], Value::Null);
        assert_eq!(body["vuelo"]["azafata1"], json!(attendant));

        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"destino": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_update_keeps_crew_of_deleted_user() {
        let app = app();
        let pilot = create_user(&app, "Ana", "Piloto").await;

        let mut body = flight("Cancún", "2025-06-20");
        body["piloto"] = json!(pilot);
        let created = create_flight(&app, body).await;
        let uri = format!("/api/vuelos/{}", created["_id"].as_str().unwrap());

        let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", pilot), None).await;
        assert_eq!(status, StatusCode::OK);

        // The edit form resends every crew slot, unchanged ones included
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({
                "estado": "retrasado",
                "piloto": pilot,
                "copiloto": null,
                "azafata1": null,
                "azafata2": null,
                "azafata3": null
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["vuelo"]["estado"], "retrasado");
        assert_eq!(body["vuelo"]["piloto"], json!(pilot));

        // Assigning a different missing user is still rejected
        let ghost = uuid::Uuid::new_v4().to_string();
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"copiloto": ghost}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("copiloto"));
    }

    #[tokio::test]
    async fn test_blank_status_on_update_keeps_stored_status() {
        let app = app();
        let mut body = flight("Cancún", "2025-06-20");
        body["estado"] = json!("cancelado");
        let created = create_flight(&app, body).await;
        let uri = format!("/api/vuelos/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"estado": "", "hora": "09:15"}))).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["vuelo"]["estado"], "cancelado");
        assert_eq!(body["vuelo"]["hora"], "09:15");

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"estado": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_flight_then_404() {
        let app = app();
        let mut body = flight("Cancún", "2025-06-20");
        body["estado"] = json!("programado");
        let created = create_flight(&app, body).await;
        let uri = format!("/api/vuelos/{}", created["_id"].as_str().unwrap());

        let missing = format!("/api/vuelos/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, Method::DELETE, &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body.get("vuelo").is_none());

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
