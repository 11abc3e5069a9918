//! Flight administration screen state
//!
//! Everything the screen shows lives in [`FlightAdminState`]: the flight list,
//! crew pickers, the form draft, two filters and the filtered view derived
//! from them. Actions take `&mut self`, so only one submit can be in flight.

use super::api::{ClientError, FlightApi};
use super::draft::FlightDraft;
use crate::api::models::{FlightResponse, UserResponse};
use crate::core::filter::filter_flights;
use tracing::{debug, warn};

const CONFIRM_UPDATE: &str = "Are you sure you want to update this flight?";
const CONFIRM_DELETE: &str = "Are you sure you want to delete this flight?";

/// Yes/no prompt shown before destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Notification shown above the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Error, text: text.into() }
    }
}

/// What happened to a submit or delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation prompt
    Cancelled,
}

pub struct FlightAdminState<A: FlightApi> {
    api: A,
    flights: Vec<FlightResponse>,
    filtered: Vec<FlightResponse>,
    pilots: Vec<UserResponse>,
    attendants: Vec<UserResponse>,
    draft: FlightDraft,
    editing_id: Option<String>,
    modal_open: bool,
    banner: Option<Banner>,
    destination_filter: String,
    date_filter: String,
}

impl<A: FlightApi> FlightAdminState<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            flights: Vec::new(),
            filtered: Vec::new(),
            pilots: Vec::new(),
            attendants: Vec::new(),
            draft: FlightDraft::default(),
            editing_id: None,
            modal_open: false,
            banner: None,
            destination_filter: String::new(),
            date_filter: String::new(),
        }
    }

    /// Fetch flights and the crew pickers
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = futures::try_join!(
            self.api.list_flights(),
            self.api.list_pilots(),
            self.api.list_flight_attendants()
        );

        match result {
            Ok((flights, pilots, attendants)) => {
                debug!(flights = flights.len(), pilots = pilots.len(), attendants = attendants.len(), "Admin data loaded");
                self.flights = flights;
                self.pilots = pilots;
                self.attendants = attendants;
                self.refresh_view();
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn flights(&self) -> &[FlightResponse] {
        &self.flights
    }

    /// Flights matching the current filters, in list order
    pub fn filtered_flights(&self) -> &[FlightResponse] {
        &self.filtered
    }

    pub fn pilots(&self) -> &[UserResponse] {
        &self.pilots
    }

    pub fn attendants(&self) -> &[UserResponse] {
        &self.attendants
    }

    pub fn draft(&self) -> &FlightDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FlightDraft {
        &mut self.draft
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn destination_filter(&self) -> &str {
        &self.destination_filter
    }

    pub fn date_filter(&self) -> &str {
        &self.date_filter
    }

    pub fn set_destination_filter(&mut self, value: impl Into<String>) {
        self.destination_filter = value.into();
        self.refresh_view();
    }

    pub fn set_date_filter(&mut self, value: impl Into<String>) {
        self.date_filter = value.into();
        self.refresh_view();
    }

    /// Open an empty form for a new flight
    pub fn open_create(&mut self) {
        self.reset_form();
        self.modal_open = true;
    }

    /// Open the form pre-filled with an existing flight
    pub fn start_edit(&mut self, id: &str) -> bool {
        let Some(flight) = self.flights.iter().find(|f| f.id == id) else {
            return false;
        };

        self.draft = FlightDraft::from_flight(flight);
        self.editing_id = Some(flight.id.clone());
        self.modal_open = true;
        true
    }

    /// Clear the draft, stop editing and close the form
    pub fn reset_form(&mut self) {
        self.draft = FlightDraft::default();
        self.editing_id = None;
        self.modal_open = false;
    }

    /// Send the form
    ///
    /// A new flight is created directly; an edit is confirmed first and sent as
    /// a sparse patch.
    pub async fn submit(&mut self, confirm: &mut impl Confirm) -> Result<Outcome, ClientError> {
        self.banner = None;

        let response = match self.editing_id.clone() {
            Some(id) => {
                if !confirm.confirm(CONFIRM_UPDATE) {
                    return Ok(Outcome::Cancelled);
                }
                let patch = match self.draft.to_patch() {
                    Ok(patch) => patch,
                    Err(problems) => return self.fail(ClientError::InvalidForm(problems)),
                };
                self.api.update_flight(&id, &patch).await
            }
            None => {
                let request = match self.draft.to_create_request() {
                    Ok(request) => request,
                    Err(problems) => return self.fail(ClientError::InvalidForm(problems)),
                };
                self.api.create_flight(&request).await
            }
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };

        if let Some(flight) = response.vuelo {
            self.upsert(flight);
        }
        self.banner = Some(Banner::success(response.message));
        self.reset_form();
        self.refresh_view();

        Ok(Outcome::Done)
    }

    /// Delete a flight after confirmation
    pub async fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> Result<Outcome, ClientError> {
        if !confirm.confirm(CONFIRM_DELETE) {
            return Ok(Outcome::Cancelled);
        }
        self.banner = None;

        let response = match self.api.delete_flight(id).await {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };

        self.flights.retain(|f| f.id != id);
        if self.editing_id.as_deref() == Some(id) {
            self.reset_form();
        }
        self.banner = Some(Banner::success(response.message));
        self.refresh_view();

        Ok(Outcome::Done)
    }

    fn upsert(&mut self, flight: FlightResponse) {
        match self.flights.iter_mut().find(|f| f.id == flight.id) {
            Some(existing) => *existing = flight,
            None => self.flights.push(flight),
        }
    }

    fn refresh_view(&mut self) {
        self.filtered = filter_flights(&self.flights, &self.destination_filter, &self.date_filter)
            .into_iter()
            .cloned()
            .collect();
    }

    fn fail<T>(&mut self, error: ClientError) -> Result<T, ClientError> {
        warn!("Flight admin action failed: {}", error);
        self.banner = Some(Banner::error(error.user_message()));
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{CreateFlightRequest, FlightActionResponse, UpdateFlightRequest};
    use crate::core::patch::Patch;
    use crate::db::models::{FlightStatus, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockApi {
        flights: Mutex<Vec<FlightResponse>>,
        last_patch: Mutex<Option<UpdateFlightRequest>>,
        fail_with: Mutex<Option<String>>,
        next_id: Mutex<u32>,
    }

    impl MockApi {
        fn with_flights(flights: Vec<FlightResponse>) -> Self {
            Self {
                flights: Mutex::new(flights),
                ..Self::default()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Mutex::new(Some(message.to_string())),
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), ClientError> {
            match self.fail_with.lock().unwrap().clone() {
                Some(message) => Err(ClientError::Api { status: 400, message }),
                None => Ok(()),
            }
        }
    }

    fn flight(id: &str, destino: &str, fecha: &str) -> FlightResponse {
        FlightResponse {
            id: id.to_string(),
            origen: "CDMX".to_string(),
            destino: destino.to_string(),
            fecha_salida: fecha.to_string(),
            fecha_llegada: fecha.to_string(),
            hora: "08:30".to_string(),
            costo: 1500.0,
            asientos_disponibles: 180,
            avion: "A320".to_string(),
            aerolinea: "Volaris".to_string(),
            estado: FlightStatus::Scheduled,
            piloto: Some("p-1".to_string()),
            copiloto: None,
            azafata1: None,
            azafata2: None,
            azafata3: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn user(id: &str, rol: Role) -> UserResponse {
        UserResponse {
            id: id.to_string(),
            nombre: "Ana".to_string(),
            apellido: "Peña".to_string(),
            email: format!("{}@example.com", id),
            telefono: "555".to_string(),
            direccion: "Calle 1".to_string(),
            pasaporte: String::new(),
            rol,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[async_trait]
    impl FlightApi for MockApi {
        async fn list_flights(&self) -> Result<Vec<FlightResponse>, ClientError> {
            self.check()?;
            Ok(self.flights.lock().unwrap().clone())
        }

        async fn list_pilots(&self) -> Result<Vec<UserResponse>, ClientError> {
            Ok(vec![user("p-1", Role::Pilot)])
        }

        async fn list_flight_attendants(&self) -> Result<Vec<UserResponse>, ClientError> {
            Ok(vec![user("a-1", Role::FlightAttendant)])
        }

        async fn create_flight(&self, request: &CreateFlightRequest) -> Result<FlightActionResponse, ClientError> {
            self.check()?;
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;

            let mut created = flight(
                &format!("new-{}", next_id),
                request.destino.as_deref().unwrap_or_default(),
                request.fecha_salida.as_deref().unwrap_or_default(),
            );
            created.piloto = request.piloto.clone();
            self.flights.lock().unwrap().push(created.clone());

            Ok(FlightActionResponse {
                success: true,
                message: "Flight created successfully".to_string(),
                vuelo: Some(created),
            })
        }

        async fn update_flight(
            &self,
            id: &str,
            request: &UpdateFlightRequest,
        ) -> Result<FlightActionResponse, ClientError> {
            self.check()?;
            *self.last_patch.lock().unwrap() = Some(request.clone());

            let mut flights = self.flights.lock().unwrap();
            let stored = flights
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| ClientError::Api { status: 404, message: "Flight not found".to_string() })?;
            if let Patch::Set(estado) = request.estado {
                stored.estado = estado;
            }
            request.piloto.clone().apply_to(&mut stored.piloto);

            Ok(FlightActionResponse {
                success: true,
                message: "Flight updated successfully".to_string(),
                vuelo: Some(stored.clone()),
            })
        }

        async fn delete_flight(&self, id: &str) -> Result<FlightActionResponse, ClientError> {
            self.check()?;
            self.flights.lock().unwrap().retain(|f| f.id != id);
            Ok(FlightActionResponse {
                success: true,
                message: "Flight deleted successfully".to_string(),
                vuelo: None,
            })
        }
    }

    async fn loaded(flights: Vec<FlightResponse>) -> FlightAdminState<MockApi> {
        let mut state = FlightAdminState::new(MockApi::with_flights(flights));
        state.load().await.unwrap();
        state
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    #[tokio::test]
    async fn test_load_fills_list_pickers_and_view() {
        let state = loaded(vec![flight("a", "Cancún", "2025-06-20")]).await;

        assert_eq!(state.flights().len(), 1);
        assert_eq!(state.filtered_flights().len(), 1);
        assert_eq!(state.pilots()[0].rol, Role::Pilot);
        assert_eq!(state.attendants()[0].rol, Role::FlightAttendant);
        assert!(state.banner().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_shows_banner() {
        let mut state = FlightAdminState::new(MockApi::failing("Database unavailable"));

        assert!(state.load().await.is_err());
        assert_eq!(state.banner(), Some(&Banner::error("Database unavailable")));
    }

    #[tokio::test]
    async fn test_filters_recompute_view() {
        let mut state = loaded(vec![
            flight("a", "Cancún", "2025-06-20"),
            flight("b", "Monterrey", "2025-06-22"),
        ])
        .await;

        state.set_destination_filter("can");
        assert_eq!(state.filtered_flights().len(), 1);
        assert_eq!(state.filtered_flights()[0].id, "a");

        state.set_destination_filter("");
        state.set_date_filter("2025-06-22");
        assert_eq!(state.filtered_flights()[0].id, "b");

        state.set_date_filter("");
        assert_eq!(state.filtered_flights().len(), 2);
    }

    #[tokio::test]
    async fn test_create_adds_flight_and_resets_form() {
        let mut state = loaded(vec![]).await;
        state.set_destination_filter("canc");
        state.open_create();
        *state.draft_mut() = FlightDraft {
            origen: "CDMX".to_string(),
            destino: "Cancún".to_string(),
            fecha_salida: "2025-06-20".to_string(),
            fecha_llegada: "2025-06-20".to_string(),
            hora: "08:30".to_string(),
            costo: "1500".to_string(),
            asientos_disponibles: "180".to_string(),
            avion: "A320".to_string(),
            aerolinea: "Volaris".to_string(),
            estado: "programado".to_string(),
            ..FlightDraft::default()
        };

        let outcome = state.submit(&mut no).await.unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(state.flights().len(), 1);
        assert_eq!(state.filtered_flights().len(), 1);
        assert_eq!(*state.draft(), FlightDraft::default());
        assert!(!state.is_modal_open());
        assert_eq!(state.banner(), Some(&Banner::success("Flight created successfully")));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_api() {
        let mut state = loaded(vec![]).await;
        state.open_create();
        state.draft_mut().destino = "Cancún".to_string();

        let err = state.submit(&mut yes).await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidForm(_)));
        assert!(state.flights().is_empty());
        assert!(state.is_modal_open());
        assert_eq!(state.banner().unwrap().kind, BannerKind::Error);
    }

    #[tokio::test]
    async fn test_edit_requires_confirmation() {
        let mut state = loaded(vec![flight("a", "Cancún", "2025-06-20")]).await;
        assert!(state.start_edit("a"));
        state.draft_mut().estado = "retrasado".to_string();

        let outcome = state.submit(&mut no).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(state.api.last_patch.lock().unwrap().is_none());
        assert_eq!(state.editing_id(), Some("a"));
        assert_eq!(state.flights()[0].estado, FlightStatus::Scheduled);

        let mut prompts = Vec::new();
        let mut record = |prompt: &str| {
            prompts.push(prompt.to_string());
            true
        };
        let outcome = state.submit(&mut record).await.unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(prompts, vec![CONFIRM_UPDATE.to_string()]);
        assert_eq!(state.flights()[0].estado, FlightStatus::Delayed);
        assert_eq!(state.editing_id(), None);
    }

    #[tokio::test]
    async fn test_edit_sends_blank_crew_as_unassign() {
        let mut state = loaded(vec![flight("a", "Cancún", "2025-06-20")]).await;
        state.start_edit("a");
        state.draft_mut().piloto.clear();

        state.submit(&mut yes).await.unwrap();

        let patch = state.api.last_patch.lock().unwrap().clone().unwrap();
        assert_eq!(patch.piloto, Patch::Clear);
        assert_eq!(patch.estado, Patch::Set(FlightStatus::Scheduled));
        assert_eq!(state.flights()[0].piloto, None);
    }

    #[tokio::test]
    async fn test_server_error_shows_message_and_keeps_form() {
        let mut state = loaded(vec![flight("a", "Cancún", "2025-06-20")]).await;
        state.start_edit("a");
        *state.api.fail_with.lock().unwrap() = Some("piloto: user 'x' does not exist".to_string());

        assert!(state.submit(&mut yes).await.is_err());

        assert_eq!(state.banner(), Some(&Banner::error("piloto: user 'x' does not exist")));
        assert_eq!(state.editing_id(), Some("a"));
        assert!(state.is_modal_open());
    }

    #[tokio::test]
    async fn test_delete_removes_locally_and_resets_edited_form() {
        let mut state = loaded(vec![
            flight("a", "Cancún", "2025-06-20"),
            flight("b", "Monterrey", "2025-06-22"),
        ])
        .await;
        state.start_edit("a");

        assert_eq!(state.delete("a", &mut no).await.unwrap(), Outcome::Cancelled);
        assert_eq!(state.flights().len(), 2);

        assert_eq!(state.delete("a", &mut yes).await.unwrap(), Outcome::Done);
        assert_eq!(state.flights().len(), 1);
        assert_eq!(state.filtered_flights()[0].id, "b");
        assert_eq!(state.editing_id(), None);
        assert!(!state.is_modal_open());
        assert_eq!(state.banner(), Some(&Banner::success("Flight deleted successfully")));
    }

    #[tokio::test]
    async fn test_edit_status_of_crewed_flight_against_live_server() {
        use crate::api::handlers::test_support::spawn_app;
        use crate::client::api::HttpFlightApi;

        let base_url = spawn_app().await;
        let http = reqwest::Client::new();

        let pilot: UserResponse = http
            .post(format!("{}/api/users", base_url))
            .json(&serde_json::json!({
                "nombre": "Ana",
                "apellido": "Peña",
                "email": "ana@example.com",
                "password": "secret",
                "telefono": "555-0100",
                "direccion": "Av. Reforma 1",
                "rol": "Piloto"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let api = HttpFlightApi::new(&base_url).unwrap();
        let mut state = FlightAdminState::new(api);
        state.load().await.unwrap();
        assert_eq!(state.pilots().len(), 1);

        state.open_create();
        *state.draft_mut() = FlightDraft {
            origen: "CDMX".to_string(),
            destino: "Cancún".to_string(),
            fecha_salida: "2025-06-20".to_string(),
            fecha_llegada: "2025-06-20".to_string(),
            hora: "08:30".to_string(),
            costo: "1500".to_string(),
            asientos_disponibles: "180".to_string(),
            avion: "A320".to_string(),
            aerolinea: "Volaris".to_string(),
            estado: "programado".to_string(),
            piloto: pilot.id.clone(),
            ..FlightDraft::default()
        };
        assert_eq!(state.submit(&mut yes).await.unwrap(), Outcome::Done);
        let flight_id = state.flights()[0].id.clone();

        // Crew references are weak; the pilot can go away under the flight
        let status = http
            .delete(format!("{}/api/users/{}", base_url, pilot.id))
            .send()
            .await
            .unwrap()
            .status();
        assert!(status.is_success());

        assert!(state.start_edit(&flight_id));
        state.draft_mut().estado = "retrasado".to_string();
        assert_eq!(state.submit(&mut yes).await.unwrap(), Outcome::Done);

        let edited = &state.flights()[0];
        assert_eq!(edited.estado, FlightStatus::Delayed);
        assert_eq!(edited.piloto.as_deref(), Some(pilot.id.as_str()));
        assert_eq!(state.banner(), Some(&Banner::success("Flight updated successfully")));
    }
}
