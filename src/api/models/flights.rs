use super::common::{
    deserialize_blank_as_none, deserialize_number_or_string, deserialize_patch_blank_as_absent,
    deserialize_patch_number,
};
use crate::core::filter::Scheduled;
use crate::core::patch::Patch;
use crate::db::models::{Flight, FlightStatus};
use serde::{Deserialize, Serialize};

// Flight API models

/// Request body for creating a flight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFlightRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destino: Option<String>,
    #[serde(rename = "fechaSalida", default, skip_serializing_if = "Option::is_none")]
    pub fecha_salida: Option<String>,
    #[serde(rename = "fechaLlegada", default, skip_serializing_if = "Option::is_none")]
    pub fecha_llegada: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub costo: Option<f64>,
    #[serde(
        rename = "asientosDisponibles",
        default,
        deserialize_with = "deserialize_number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub asientos_disponibles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerolinea: Option<String>,
    /// Defaults to `programado`
    #[serde(
        default,
        deserialize_with = "deserialize_blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub estado: Option<FlightStatus>,
    /// Crew user ids; `""` means unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piloto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copiloto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azafata1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azafata2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azafata3: Option<String>,
}

/// Sparse update of a flight
///
/// For crew fields both `null` and `""` unassign the slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFlightRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub origen: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub destino: Patch<String>,
    #[serde(rename = "fechaSalida", default, skip_serializing_if = "Patch::is_absent")]
    pub fecha_salida: Patch<String>,
    #[serde(rename = "fechaLlegada", default, skip_serializing_if = "Patch::is_absent")]
    pub fecha_llegada: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub hora: Patch<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_number",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub costo: Patch<f64>,
    #[serde(
        rename = "asientosDisponibles",
        default,
        deserialize_with = "deserialize_patch_number",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub asientos_disponibles: Patch<u32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub avion: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub aerolinea: Patch<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_patch_blank_as_absent",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub estado: Patch<FlightStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub piloto: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub copiloto: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub azafata1: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub azafata2: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub azafata3: Patch<String>,
}

/// Query parameters for listing flights
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightQuery {
    pub destino: Option<String>,
    pub fecha: Option<String>,
}

/// Flight as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub origen: String,
    pub destino: String,
    #[serde(rename = "fechaSalida")]
    pub fecha_salida: String,
    #[serde(rename = "fechaLlegada")]
    pub fecha_llegada: String,
    pub hora: String,
    pub costo: f64,
    #[serde(rename = "asientosDisponibles")]
    pub asientos_disponibles: u32,
    pub avion: String,
    pub aerolinea: String,
    pub estado: FlightStatus,
    #[serde(default)]
    pub piloto: Option<String>,
    #[serde(default)]
    pub copiloto: Option<String>,
    #[serde(default)]
    pub azafata1: Option<String>,
    #[serde(default)]
    pub azafata2: Option<String>,
    #[serde(default)]
    pub azafata3: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id,
            origen: flight.origen,
            destino: flight.destino,
            fecha_salida: flight.fecha_salida,
            fecha_llegada: flight.fecha_llegada,
            hora: flight.hora,
            costo: flight.costo,
            asientos_disponibles: flight.asientos_disponibles,
            avion: flight.avion,
            aerolinea: flight.aerolinea,
            estado: flight.estado,
            piloto: flight.piloto,
            copiloto: flight.copiloto,
            azafata1: flight.azafata1,
            azafata2: flight.azafata2,
            azafata3: flight.azafata3,
            created_at: flight.created_at,
            updated_at: flight.updated_at,
        }
    }
}

impl Scheduled for FlightResponse {
    fn destination(&self) -> &str {
        &self.destino
    }

    fn departure_date(&self) -> &str {
        &self.fecha_salida
    }
}

/// Response for flight create, update and delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vuelo: Option<FlightResponse>,
}
