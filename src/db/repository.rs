//! Repository pattern implementation for data access layer
//!
//! This module provides the Repository pattern for abstracting database operations.

use crate::core::error::{AdminError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Flight, Role, User};
use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<()>;

    /// Delete an entity by its ID, returning the removed entity
    async fn delete(&self, id: &str) -> Result<Option<T>>;
}

const EMAIL_TAKEN: &str = "Email is already registered";

const USER_COLUMNS: &str = "id, nombre, apellido, email, password_hash, telefono, direccion, \
                            pasaporte, rol, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        nombre: row.get(1)?,
        apellido: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        telefono: row.get(5)?,
        direccion: row.get(6)?,
        pasaporte: row.get(7)?,
        rol: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Criteria for searching users; `None` means "don't filter on this field"
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub rol: Option<Role>,
}

impl UserFilter {
    fn matches(&self, user: &User) -> bool {
        contains_ignore_case(&user.nombre, self.nombre.as_deref())
            && contains_ignore_case(&user.apellido, self.apellido.as_deref())
            && contains_ignore_case(&user.email, self.email.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_string();
        self.db.execute(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM users WHERE email = ? COLLATE NOCASE", USER_COLUMNS),
                [&email],
                user_from_row,
            ).optional()
            .map_err(AdminError::DatabaseError)
        }).await
    }

    /// All users holding a role
    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        self.search(UserFilter {
            rol: Some(role),
            ..UserFilter::default()
        }).await
    }

    /// Search users
    ///
    /// Role is matched in SQL. Name and email substrings are matched here
    /// because SQLite's LOWER() only folds ASCII ("Peña" vs "PEÑA").
    pub async fn search(&self, filter: UserFilter) -> Result<Vec<User>> {
        let role = filter.rol;
        let users = self.db.execute(move |conn| {
            let mut query = format!("SELECT {} FROM users", USER_COLUMNS);
            if role.is_some() {
                query += " WHERE rol = ?";
            }
            query += " ORDER BY created_at, rowid";

            let mut stmt = conn.prepare(&query).map_err(AdminError::DatabaseError)?;
            let rows = match role {
                Some(role) => stmt.query_map([role], user_from_row),
                None => stmt.query_map([], user_from_row),
            };

            let users = rows.map_err(AdminError::DatabaseError)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(AdminError::DatabaseError)?;

            Ok(users)
        }).await?;

        Ok(users.into_iter().filter(|user| filter.matches(user)).collect())
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db.execute(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [&id],
                user_from_row,
            ).optional()
            .map_err(AdminError::DatabaseError)
        }).await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.search(UserFilter::default()).await
    }

    async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, nombre, apellido, email, password_hash, telefono, direccion, \
                 pasaporte, rol, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    &user.id,
                    &user.nombre,
                    &user.apellido,
                    &user.email,
                    &user.password_hash,
                    &user.telefono,
                    &user.direccion,
                    &user.pasaporte,
                    &user.rol,
                    &user.created_at,
                    &user.updated_at,
                ],
            ).map_err(|e| AdminError::from_unique_violation(e, EMAIL_TAKEN))?;
            Ok(())
        }).await
    }

    async fn update(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db.execute(move |conn| {
            conn.execute(
                "UPDATE users SET nombre = ?, apellido = ?, email = ?, password_hash = ?, telefono = ?, \
                 direccion = ?, pasaporte = ?, rol = ?, updated_at = ? WHERE id = ?",
                rusqlite::params![
                    &user.nombre,
                    &user.apellido,
                    &user.email,
                    &user.password_hash,
                    &user.telefono,
                    &user.direccion,
                    &user.pasaporte,
                    &user.rol,
                    &user.updated_at,
                    &user.id,
                ],
            ).map_err(|e| AdminError::from_unique_violation(e, EMAIL_TAKEN))?;
            Ok(())
        }).await
    }

    async fn delete(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db.execute(move |conn| {
            let user = conn.query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [&id],
                user_from_row,
            ).optional()
            .map_err(AdminError::DatabaseError)?;

            if user.is_some() {
                conn.execute("DELETE FROM users WHERE id = ?", [&id])
                    .map_err(AdminError::DatabaseError)?;
            }
            Ok(user)
        }).await
    }
}

const FLIGHT_COLUMNS: &str = "id, origen, destino, fecha_salida, fecha_llegada, hora, costo, \
                              asientos_disponibles, avion, aerolinea, estado, piloto, copiloto, \
                              azafata1, azafata2, azafata3, created_at, updated_at";

fn flight_from_row(row: &Row<'_>) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: row.get(0)?,
        origen: row.get(1)?,
        destino: row.get(2)?,
        fecha_salida: row.get(3)?,
        fecha_llegada: row.get(4)?,
        hora: row.get(5)?,
        costo: row.get(6)?,
        asientos_disponibles: row.get(7)?,
        avion: row.get(8)?,
        aerolinea: row.get(9)?,
        estado: row.get(10)?,
        piloto: row.get(11)?,
        copiloto: row.get(12)?,
        azafata1: row.get(13)?,
        azafata2: row.get(14)?,
        azafata3: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}

/// Repository for Flight entities
pub struct FlightRepository {
    db: Arc<DatabaseManager>,
}

impl FlightRepository {
    /// Create a new FlightRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Flight> for FlightRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Flight>> {
        let id = id.to_string();
        self.db.execute(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM flights WHERE id = ?", FLIGHT_COLUMNS),
                [&id],
                flight_from_row,
            ).optional()
            .map_err(AdminError::DatabaseError)
        }).await
    }

    async fn find_all(&self) -> Result<Vec<Flight>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                &format!("SELECT {} FROM flights ORDER BY created_at, rowid", FLIGHT_COLUMNS)
            ).map_err(AdminError::DatabaseError)?;

            let flights = stmt.query_map([], flight_from_row)
                .map_err(AdminError::DatabaseError)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(AdminError::DatabaseError)?;

            Ok(flights)
        }).await
    }

    async fn create(&self, flight: &Flight) -> Result<()> {
        let flight = flight.clone();
        self.db.execute(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO flights ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    FLIGHT_COLUMNS
                ),
                rusqlite::params![
                    &flight.id,
                    &flight.origen,
                    &flight.destino,
                    &flight.fecha_salida,
                    &flight.fecha_llegada,
                    &flight.hora,
                    flight.costo,
                    flight.asientos_disponibles,
                    &flight.avion,
                    &flight.aerolinea,
                    &flight.estado,
                    &flight.piloto,
                    &flight.copiloto,
                    &flight.azafata1,
                    &flight.azafata2,
                    &flight.azafata3,
                    &flight.created_at,
                    &flight.updated_at,
                ],
            ).map_err(AdminError::DatabaseError)?;
            Ok(())
        }).await
    }

    async fn update(&self, flight: &Flight) -> Result<()> {
        let flight = flight.clone();
        self.db.execute(move |conn| {
            conn.execute(
                "UPDATE flights SET origen = ?, destino = ?, fecha_salida = ?, fecha_llegada = ?, hora = ?, \
                 costo = ?, asientos_disponibles = ?, avion = ?, aerolinea = ?, estado = ?, piloto = ?, \
                 copiloto = ?, azafata1 = ?, azafata2 = ?, azafata3 = ?, updated_at = ? WHERE id = ?",
                rusqlite::params![
                    &flight.origen,
                    &flight.destino,
                    &flight.fecha_salida,
                    &flight.fecha_llegada,
                    &flight.hora,
                    flight.costo,
                    flight.asientos_disponibles,
                    &flight.avion,
                    &flight.aerolinea,
                    &flight.estado,
                    &flight.piloto,
                    &flight.copiloto,
                    &flight.azafata1,
                    &flight.azafata2,
                    &flight.azafata3,
                    &flight.updated_at,
                    &flight.id,
                ],
            ).map_err(AdminError::DatabaseError)?;
            Ok(())
        }).await
    }

    async fn delete(&self, id: &str) -> Result<Option<Flight>> {
        let id = id.to_string();
        self.db.execute(move |conn| {
            let flight = conn.query_row(
                &format!("SELECT {} FROM flights WHERE id = ?", FLIGHT_COLUMNS),
                [&id],
                flight_from_row,
            ).optional()
            .map_err(AdminError::DatabaseError)?;

            if flight.is_some() {
                conn.execute("DELETE FROM flights WHERE id = ?", [&id])
                    .map_err(AdminError::DatabaseError)?;
            }
            Ok(flight)
        }).await
    }
}
