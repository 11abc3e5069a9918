//! Flight form draft
//!
//! The create/edit form holds every field as text, exactly as typed. Requests
//! are built from the draft on submit.

use crate::api::models::{CreateFlightRequest, FlightResponse, UpdateFlightRequest};
use crate::core::patch::Patch;
use crate::db::models::FlightStatus;

/// Text mirror of the flight form; every field starts empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightDraft {
    pub origen: String,
    pub destino: String,
    pub fecha_salida: String,
    pub fecha_llegada: String,
    pub hora: String,
    pub costo: String,
    pub asientos_disponibles: String,
    pub avion: String,
    pub aerolinea: String,
    pub estado: String,
    pub piloto: String,
    pub copiloto: String,
    pub azafata1: String,
    pub azafata2: String,
    pub azafata3: String,
}

/// Trimmed value, `None` when blank
fn filled(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_costo(value: &str, problems: &mut Vec<String>) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(costo) if costo.is_finite() && costo >= 0.0 => Some(costo),
        _ => {
            problems.push("costo must be a non-negative number".to_string());
            None
        }
    }
}

fn parse_seats(value: &str, problems: &mut Vec<String>) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(seats) => Some(seats),
        Err(_) => {
            problems.push("asientosDisponibles must be a non-negative whole number".to_string());
            None
        }
    }
}

fn parse_estado(value: &str, problems: &mut Vec<String>) -> Option<FlightStatus> {
    match value.trim().parse::<FlightStatus>() {
        Ok(estado) => Some(estado),
        Err(e) => {
            problems.push(e.to_string());
            None
        }
    }
}

impl FlightDraft {
    /// Fill the form from an existing flight; unassigned crew becomes ""
    pub fn from_flight(flight: &FlightResponse) -> Self {
        let crew = |id: &Option<String>| id.clone().unwrap_or_default();

        Self {
            origen: flight.origen.clone(),
            destino: flight.destino.clone(),
            fecha_salida: flight.fecha_salida.clone(),
            fecha_llegada: flight.fecha_llegada.clone(),
            hora: flight.hora.clone(),
            costo: flight.costo.to_string(),
            asientos_disponibles: flight.asientos_disponibles.to_string(),
            avion: flight.avion.clone(),
            aerolinea: flight.aerolinea.clone(),
            estado: flight.estado.as_str().to_string(),
            piloto: crew(&flight.piloto),
            copiloto: crew(&flight.copiloto),
            azafata1: crew(&flight.azafata1),
            azafata2: crew(&flight.azafata2),
            azafata3: crew(&flight.azafata3),
        }
    }

    /// Build a create request
    ///
    /// Every field but the crew is required. Blank crew pickers are left out.
    pub fn to_create_request(&self) -> Result<CreateFlightRequest, Vec<String>> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("origen", &self.origen),
            ("destino", &self.destino),
            ("fechaSalida", &self.fecha_salida),
            ("fechaLlegada", &self.fecha_llegada),
            ("hora", &self.hora),
            ("costo", &self.costo),
            ("asientosDisponibles", &self.asientos_disponibles),
            ("avion", &self.avion),
            ("aerolinea", &self.aerolinea),
            ("estado", &self.estado),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{} is required", field));
            }
        }
        if !problems.is_empty() {
            return Err(problems);
        }

        let costo = parse_costo(&self.costo, &mut problems);
        let asientos_disponibles = parse_seats(&self.asientos_disponibles, &mut problems);
        let estado = parse_estado(&self.estado, &mut problems);
        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(CreateFlightRequest {
            origen: filled(&self.origen),
            destino: filled(&self.destino),
            fecha_salida: filled(&self.fecha_salida),
            fecha_llegada: filled(&self.fecha_llegada),
            hora: filled(&self.hora),
            costo,
            asientos_disponibles,
            avion: filled(&self.avion),
            aerolinea: filled(&self.aerolinea),
            estado,
            piloto: filled(&self.piloto),
            copiloto: filled(&self.copiloto),
            azafata1: filled(&self.azafata1),
            azafata2: filled(&self.azafata2),
            azafata3: filled(&self.azafata3),
        })
    }

    /// Build a sparse update
    ///
    /// Blank non-crew fields are left out so they keep their stored value. The
    /// five crew fields are always sent and a blank one unassigns the slot.
    pub fn to_patch(&self) -> Result<UpdateFlightRequest, Vec<String>> {
        let mut problems = Vec::new();

        let text = |value: &str| filled(value).map_or(Patch::Absent, Patch::Set);
        let crew = |value: &str| filled(value).map_or(Patch::Clear, Patch::Set);

        let costo = match filled(&self.costo) {
            Some(value) => parse_costo(&value, &mut problems).map_or(Patch::Absent, Patch::Set),
            None => Patch::Absent,
        };
        let asientos_disponibles = match filled(&self.asientos_disponibles) {
            Some(value) => parse_seats(&value, &mut problems).map_or(Patch::Absent, Patch::Set),
            None => Patch::Absent,
        };
        let estado = match filled(&self.estado) {
            Some(value) => parse_estado(&value, &mut problems).map_or(Patch::Absent, Patch::Set),
            None => Patch::Absent,
        };
        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(UpdateFlightRequest {
            origen: text(&self.origen),
            destino: text(&self.destino),
            fecha_salida: text(&self.fecha_salida),
            fecha_llegada: text(&self.fecha_llegada),
            hora: text(&self.hora),
            costo,
            asientos_disponibles,
            avion: text(&self.avion),
            aerolinea: text(&self.aerolinea),
            estado,
            piloto: crew(&self.piloto),
            copiloto: crew(&self.copiloto),
            azafata1: crew(&self.azafata1),
            azafata2: crew(&self.azafata2),
            azafata3: crew(&self.azafata3),
        })
    }
}
