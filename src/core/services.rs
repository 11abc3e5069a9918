//! Business logic services
//!
//! This module implements the Application Layer services that coordinate between
//! the REST API Layer and the Infrastructure Layer (database).

use crate::api::models::{
    CreateFlightRequest, CreateUserRequest, FlightQuery, UpdateFlightRequest, UpdateUserRequest,
    UserSearchQuery,
};
use crate::auth::password::hash_password;
use crate::core::error::{AdminError, Result};
use crate::core::filter::filter_flights;
use crate::core::patch::Patch;
use crate::db::models::{CrewSlot, Flight, FlightStatus, Role, User};
use crate::db::repository::{FlightRepository, Repository, UserFilter, UserRepository};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Whether a string has the shape of an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn parse_id(id: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|_| AdminError::InvalidId(format!("Invalid {} id '{}'", what, id)))
}

fn parse_role(value: &str) -> Result<Role> {
    value.parse().map_err(|_| {
        let expected: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        AdminError::ValidationError(format!(
            "Invalid role '{}', expected one of: {}",
            value,
            expected.join(", ")
        ))
    })
}

/// Non-empty trimmed value of an optional field
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Apply a patch to a field that can't be emptied
fn patch_required(field: &str, patch: Patch<String>, target: &mut String, problems: &mut Vec<String>) {
    match patch {
        Patch::Absent => {}
        Patch::Set(value) if !value.trim().is_empty() => *target = value.trim().to_string(),
        Patch::Set(_) | Patch::Clear => problems.push(format!("{} cannot be empty", field)),
    }
}

/// bcrypt is CPU-bound, keep it off the async workers
async fn hash_in_background(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AdminError::TaskError(format!("Password hashing task failed: {}", e)))?
}

fn patch_value<T>(field: &str, patch: Patch<T>, target: &mut T, problems: &mut Vec<String>) {
    match patch {
        Patch::Absent => {}
        Patch::Set(value) => *target = value,
        Patch::Clear => problems.push(format!("{} cannot be empty", field)),
    }
}

/// User service for managing user business logic
pub struct UserService {
    user_repo: Arc<UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    /// Create a new UserService
    pub fn new(user_repo: Arc<UserRepository>, bcrypt_cost: u32) -> Self {
        Self { user_repo, bcrypt_cost }
    }

    /// Create a user with a hashed password and a derived passport name
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let required = [
            ("nombre", &request.nombre),
            ("apellido", &request.apellido),
            ("email", &request.email),
            ("password", &request.password),
            ("telefono", &request.telefono),
            ("direccion", &request.direccion),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(field, _)| format!("{} is required", field))
            .collect();
        if !missing.is_empty() {
            return Err(AdminError::InvalidFields(missing));
        }

        let nombre = request.nombre.unwrap_or_default().trim().to_string();
        let apellido = request.apellido.unwrap_or_default().trim().to_string();
        let email = request.email.unwrap_or_default().trim().to_string();
        let password = request.password.unwrap_or_default();

        if !is_valid_email(&email) {
            return Err(AdminError::ValidationError(format!("Invalid email '{}'", email)));
        }

        let rol = match present(&request.rol) {
            Some(rol) => parse_role(rol)?,
            None => Role::default(),
        };

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AdminError::Conflict("Email is already registered".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let user = User {
            id: Uuid::new_v4().to_string(),
            pasaporte: User::derived_passport(&nombre, &apellido),
            nombre,
            apellido,
            email,
            password_hash: hash_in_background(password, self.bcrypt_cost).await?,
            telefono: request.telefono.unwrap_or_default().trim().to_string(),
            direccion: request.direccion.unwrap_or_default().trim().to_string(),
            rol,
            created_at: now.clone(),
            updated_at: now,
        };

        // The unique index still catches a concurrent insert of the same email
        self.user_repo.create(&user).await?;
        info!(user_id = %user.id, rol = %user.rol, "User created");

        Ok(user)
    }

    /// Get all users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo.find_all().await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> Result<User> {
        parse_id(id, "user")?;

        self.user_repo
            .find_by_id(id.trim())
            .await?
            .ok_or_else(|| AdminError::NotFound("User not found".to_string()))
    }

    /// Search users by name, surname, email substring and exact role
    pub async fn search_users(&self, query: UserSearchQuery) -> Result<Vec<User>> {
        let rol = match present(&query.rol) {
            Some(rol) => Some(parse_role(rol)?),
            None => None,
        };

        let filter = UserFilter {
            nombre: present(&query.nombre).map(String::from),
            apellido: present(&query.apellido).map(String::from),
            email: present(&query.email).map(String::from),
            rol,
        };

        self.user_repo.search(filter).await
    }

    /// All users with the given role name
    pub async fn users_by_role(&self, rol: &str) -> Result<Vec<User>> {
        let rol = parse_role(rol)?;
        self.user_repo.find_by_role(rol).await
    }

    /// Apply a sparse update
    ///
    /// Required fields can be changed but not emptied. The password is only
    /// re-hashed when a non-empty one is supplied.
    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<User> {
        let mut user = self.get_user(id).await?;
        let mut problems = Vec::new();

        let current_email = user.email.clone();

        patch_required("nombre", request.nombre, &mut user.nombre, &mut problems);
        patch_required("apellido", request.apellido, &mut user.apellido, &mut problems);
        patch_required("email", request.email, &mut user.email, &mut problems);
        patch_required("telefono", request.telefono, &mut user.telefono, &mut problems);
        patch_required("direccion", request.direccion, &mut user.direccion, &mut problems);

        match request.pasaporte {
            Patch::Absent => {}
            Patch::Clear => user.pasaporte.clear(),
            Patch::Set(value) => user.pasaporte = value.trim().to_string(),
        }

        match request.rol {
            Patch::Absent => {}
            Patch::Set(value) if !value.trim().is_empty() => user.rol = parse_role(&value)?,
            Patch::Set(_) | Patch::Clear => problems.push("rol cannot be empty".to_string()),
        }

        if !problems.is_empty() {
            return Err(AdminError::InvalidFields(problems));
        }

        if user.email != current_email {
            if !is_valid_email(&user.email) {
                return Err(AdminError::ValidationError(format!("Invalid email '{}'", user.email)));
            }

            if let Some(other) = self.user_repo.find_by_email(&user.email).await? {
                if other.id != user.id {
                    return Err(AdminError::Conflict(
                        "Email is already registered by another user".to_string(),
                    ));
                }
            }
        }

        if let Patch::Set(password) = request.password {
            if !password.is_empty() {
                user.password_hash = hash_in_background(password, self.bcrypt_cost).await?;
            }
        }

        user.updated_at = Utc::now().to_rfc3339();
        self.user_repo.update(&user).await?;
        info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    /// Delete a user and return the removed record
    ///
    /// Flights that reference the user as crew are left untouched.
    pub async fn delete_user(&self, id: &str) -> Result<User> {
        parse_id(id, "user")?;

        let user = self
            .user_repo
            .delete(id.trim())
            .await?
            .ok_or_else(|| AdminError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }
}

/// Flight service for managing flight business logic
pub struct FlightService {
    flight_repo: Arc<FlightRepository>,
    user_repo: Arc<UserRepository>,
}

impl FlightService {
    /// Create a new FlightService
    pub fn new(flight_repo: Arc<FlightRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self { flight_repo, user_repo }
    }

    /// All flights, optionally filtered by destination and departure date
    pub async fn list_flights(&self, query: FlightQuery) -> Result<Vec<Flight>> {
        let flights = self.flight_repo.find_all().await?;

        let destination = query.destino.unwrap_or_default();
        let date = query.fecha.unwrap_or_default();
        if destination.is_empty() && date.is_empty() {
            return Ok(flights);
        }

        Ok(filter_flights(&flights, &destination, &date)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Get a flight by ID
    pub async fn get_flight(&self, id: &str) -> Result<Flight> {
        parse_id(id, "flight")?;

        self.flight_repo
            .find_by_id(id.trim())
            .await?
            .ok_or_else(|| AdminError::NotFound("Flight not found".to_string()))
    }

    /// Create a flight; all fields except the crew are required
    pub async fn create_flight(&self, request: CreateFlightRequest) -> Result<Flight> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("origen", &request.origen),
            ("destino", &request.destino),
            ("fechaSalida", &request.fecha_salida),
            ("fechaLlegada", &request.fecha_llegada),
            ("hora", &request.hora),
            ("avion", &request.avion),
            ("aerolinea", &request.aerolinea),
        ] {
            if present(value).is_none() {
                missing.push(format!("{} is required", field));
            }
        }
        if request.costo.is_none() {
            missing.push("costo is required".to_string());
        }
        if request.asientos_disponibles.is_none() {
            missing.push("asientosDisponibles is required".to_string());
        }
        if !missing.is_empty() {
            return Err(AdminError::InvalidFields(missing));
        }

        let text = |value: Option<String>| value.unwrap_or_default().trim().to_string();
        let crew = |value: Option<String>| present(&value).map(String::from);

        let now = Utc::now().to_rfc3339();
        let flight = Flight {
            id: Uuid::new_v4().to_string(),
            origen: text(request.origen),
            destino: text(request.destino),
            fecha_salida: text(request.fecha_salida),
            fecha_llegada: text(request.fecha_llegada),
            hora: text(request.hora),
            costo: request.costo.unwrap_or_default(),
            asientos_disponibles: request.asientos_disponibles.unwrap_or_default(),
            avion: text(request.avion),
            aerolinea: text(request.aerolinea),
            estado: request.estado.unwrap_or(FlightStatus::Scheduled),
            piloto: crew(request.piloto),
            copiloto: crew(request.copiloto),
            azafata1: crew(request.azafata1),
            azafata2: crew(request.azafata2),
            azafata3: crew(request.azafata3),
            created_at: now.clone(),
            updated_at: now,
        };

        let mut problems = flight.validate();
        problems.extend(self.check_crew(&flight, &CrewSlot::ALL).await?);
        if !problems.is_empty() {
            return Err(AdminError::InvalidFields(problems));
        }

        self.flight_repo.create(&flight).await?;
        info!(flight_id = %flight.id, destino = %flight.destino, "Flight created");

        Ok(flight)
    }

    /// Apply a sparse update
    ///
    /// Crew fields sent as `null` or `""` are unassigned. Only slots whose
    /// member changes are checked; resending the current id of a deleted user
    /// is accepted.
    pub async fn update_flight(&self, id: &str, request: UpdateFlightRequest) -> Result<Flight> {
        let mut flight = self.get_flight(id).await?;
        let mut problems = Vec::new();

        patch_required("origen", request.origen, &mut flight.origen, &mut problems);
        patch_required("destino", request.destino, &mut flight.destino, &mut problems);
        patch_required("fechaSalida", request.fecha_salida, &mut flight.fecha_salida, &mut problems);
        patch_required("fechaLlegada", request.fecha_llegada, &mut flight.fecha_llegada, &mut problems);
        patch_required("hora", request.hora, &mut flight.hora, &mut problems);
        patch_required("avion", request.avion, &mut flight.avion, &mut problems);
        patch_required("aerolinea", request.aerolinea, &mut flight.aerolinea, &mut problems);
        patch_value("costo", request.costo, &mut flight.costo, &mut problems);
        patch_value(
            "asientosDisponibles",
            request.asientos_disponibles,
            &mut flight.asientos_disponibles,
            &mut problems,
        );
        patch_value("estado", request.estado, &mut flight.estado, &mut problems);

        let mut assigned = Vec::new();
        for (slot, patch) in [
            (CrewSlot::Pilot, request.piloto),
            (CrewSlot::CoPilot, request.copiloto),
            (CrewSlot::Attendant1, request.azafata1),
            (CrewSlot::Attendant2, request.azafata2),
            (CrewSlot::Attendant3, request.azafata3),
        ] {
            let patch = patch.empty_as_clear().map(|id| id.trim().to_string());
            if let Patch::Set(id) = &patch {
                if flight.crew(slot) != Some(id.as_str()) {
                    assigned.push(slot);
                }
            }
            patch.apply_to(flight.crew_mut(slot));
        }

        if !problems.is_empty() {
            return Err(AdminError::InvalidFields(problems));
        }

        let mut problems = flight.validate();
        problems.extend(self.check_crew(&flight, &assigned).await?);
        if !problems.is_empty() {
            return Err(AdminError::InvalidFields(problems));
        }

        flight.updated_at = Utc::now().to_rfc3339();
        self.flight_repo.update(&flight).await?;
        info!(flight_id = %flight.id, "Flight updated");

        Ok(flight)
    }

    /// Delete a flight
    pub async fn delete_flight(&self, id: &str) -> Result<Flight> {
        parse_id(id, "flight")?;

        let flight = self
            .flight_repo
            .delete(id.trim())
            .await?
            .ok_or_else(|| AdminError::NotFound("Flight not found".to_string()))?;

        info!(flight_id = %flight.id, "Flight deleted");
        Ok(flight)
    }

    /// Check that each assigned slot references an existing user with the right role
    async fn check_crew(&self, flight: &Flight, slots: &[CrewSlot]) -> Result<Vec<String>> {
        let mut problems = Vec::new();

        for slot in slots {
            let Some(user_id) = flight.crew(*slot) else {
                continue;
            };

            let required = slot.required_role();
            match self.user_repo.find_by_id(user_id).await? {
                None => problems.push(format!("{}: user '{}' does not exist", slot.field(), user_id)),
                Some(user) if user.rol != required => problems.push(format!(
                    "{}: user '{}' has role {}, expected {}",
                    slot.field(),
                    user_id,
                    user.rol,
                    required
                )),
                Some(_) => {}
            }
        }

        Ok(problems)
    }
}
