//! Database models
//!
//! Records as stored, plus the closed enums for role, flight status and crew slot.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User record in the database
///
/// Not serializable; API responses go through `UserResponse`, which has no
/// password field.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub password_hash: String,
    pub telefono: String,
    pub direccion: String,
    pub pasaporte: String,
    pub rol: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Passport document name derived from the user's names
    pub fn derived_passport(nombre: &str, apellido: &str) -> String {
        format!(
            "{}_{}_pasaporte.png",
            nombre.trim().to_lowercase(),
            apellido.trim().to_lowercase()
        )
    }
}

/// Flight record in the database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub id: String,
    pub origen: String,
    pub destino: String,
    pub fecha_salida: String,
    pub fecha_llegada: String,
    pub hora: String,
    pub costo: f64,
    pub asientos_disponibles: u32,
    pub avion: String,
    pub aerolinea: String,
    pub estado: FlightStatus,
    pub piloto: Option<String>,
    pub copiloto: Option<String>,
    pub azafata1: Option<String>,
    pub azafata2: Option<String>,
    pub azafata3: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Flight {
    /// The user assigned to a crew slot
    pub fn crew(&self, slot: CrewSlot) -> Option<&str> {
        self.crew_slot(slot).as_deref()
    }

    pub fn crew_mut(&mut self, slot: CrewSlot) -> &mut Option<String> {
        match slot {
            CrewSlot::Pilot => &mut self.piloto,
            CrewSlot::CoPilot => &mut self.copiloto,
            CrewSlot::Attendant1 => &mut self.azafata1,
            CrewSlot::Attendant2 => &mut self.azafata2,
            CrewSlot::Attendant3 => &mut self.azafata3,
        }
    }

    fn crew_slot(&self, slot: CrewSlot) -> &Option<String> {
        match slot {
            CrewSlot::Pilot => &self.piloto,
            CrewSlot::CoPilot => &self.copiloto,
            CrewSlot::Attendant1 => &self.azafata1,
            CrewSlot::Attendant2 => &self.azafata2,
            CrewSlot::Attendant3 => &self.azafata3,
        }
    }

    /// Check field formats and cross-field rules; returns every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("origen", &self.origen),
            ("destino", &self.destino),
            ("avion", &self.avion),
            ("aerolinea", &self.aerolinea),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{} is required", field));
            }
        }

        let departure = parse_date("fechaSalida", &self.fecha_salida, &mut problems);
        let arrival = parse_date("fechaLlegada", &self.fecha_llegada, &mut problems);
        if let (Some(departure), Some(arrival)) = (departure, arrival) {
            if arrival < departure {
                problems.push("fechaLlegada cannot be before fechaSalida".to_string());
            }
        }

        if chrono::NaiveTime::parse_from_str(&self.hora, "%H:%M").is_err() {
            problems.push("hora must use the HH:MM format".to_string());
        }

        if !self.costo.is_finite() || self.costo < 0.0 {
            problems.push("costo must be a non-negative number".to_string());
        }

        problems
    }
}

fn parse_date(field: &str, value: &str, problems: &mut Vec<String>) -> Option<chrono::NaiveDate> {
    match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            problems.push(format!("{} must use the YYYY-MM-DD format", field));
            None
        }
    }
}

impl crate::core::filter::Scheduled for Flight {
    fn destination(&self) -> &str {
        &self.destino
    }

    fn departure_date(&self) -> &str {
        &self.fecha_salida
    }
}

/// Error for an unknown enum value coming from a request or the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Pasajero")]
    Passenger,
    #[serde(rename = "Piloto")]
    Pilot,
    #[serde(rename = "Azafata")]
    FlightAttendant,
    #[serde(rename = "Admin")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Passenger, Role::Pilot, Role::FlightAttendant, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Passenger => "Pasajero",
            Role::Pilot => "Piloto",
            Role::FlightAttendant => "Azafata",
            Role::Admin => "Admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Passenger
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant {
                kind: "role",
                value: s.to_string(),
            })
    }
}

/// Flight status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    #[serde(rename = "programado")]
    Scheduled,
    #[serde(rename = "retrasado")]
    Delayed,
    #[serde(rename = "cancelado")]
    Cancelled,
    #[serde(rename = "enVuelo")]
    InFlight,
    #[serde(rename = "aterrizado")]
    Landed,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 5] = [
        FlightStatus::Scheduled,
        FlightStatus::Delayed,
        FlightStatus::Cancelled,
        FlightStatus::InFlight,
        FlightStatus::Landed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "programado",
            FlightStatus::Delayed => "retrasado",
            FlightStatus::Cancelled => "cancelado",
            FlightStatus::InFlight => "enVuelo",
            FlightStatus::Landed => "aterrizado",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlightStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant {
                kind: "flight status",
                value: s.to_string(),
            })
    }
}

/// One of the five crew positions on a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrewSlot {
    Pilot,
    CoPilot,
    Attendant1,
    Attendant2,
    Attendant3,
}

impl CrewSlot {
    pub const ALL: [CrewSlot; 5] = [
        CrewSlot::Pilot,
        CrewSlot::CoPilot,
        CrewSlot::Attendant1,
        CrewSlot::Attendant2,
        CrewSlot::Attendant3,
    ];

    /// Wire and column name
    pub fn field(&self) -> &'static str {
        match self {
            CrewSlot::Pilot => "piloto",
            CrewSlot::CoPilot => "copiloto",
            CrewSlot::Attendant1 => "azafata1",
            CrewSlot::Attendant2 => "azafata2",
            CrewSlot::Attendant3 => "azafata3",
        }
    }

    /// Role a user needs to fill this slot
    pub fn required_role(&self) -> Role {
        match self {
            CrewSlot::Pilot | CrewSlot::CoPilot => Role::Pilot,
            CrewSlot::Attendant1 | CrewSlot::Attendant2 | CrewSlot::Attendant3 => Role::FlightAttendant,
        }
    }
}

fn text_column<T: FromStr<Err = UnknownVariant>>(value: ValueRef<'_>) -> FromSqlResult<T> {
    value
        .as_str()?
        .parse()
        .map_err(|e: UnknownVariant| FromSqlError::Other(Box::new(e)))
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_column(value)
    }
}

impl ToSql for FlightStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for FlightStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_column(value)
    }
}
