// @zen-component: BOOKING-Controller
//
//! Async booking controller.
//!
//! Wraps the synchronous `BookingState` with the backend calls the booking
//! screen makes: option loading, generation-guarded availability lookups,
//! submit and cancel. Availability results are applied only when their
//! ticket is still current, so the slots shown always belong to the latest
//! (vet, date, duration) key.

use chrono::NaiveTime;
use tracing::{debug, info};
use vetclinic_core::booking::{
    AvailabilityQuery, BookingError, BookingState, RequestGenerations, Slot, Ticket,
};
use vetclinic_core::models::appointment::Appointment;
use vetclinic_core::models::clinic::{Pet, Veterinarian};

use super::{Notice, report};
use crate::api::BookingBackend;
use crate::error::ApiResult;

const SAVED_MESSAGE: &str = "Appointment saved";
const CANCELLED_MESSAGE: &str = "Appointment cancelled";

pub struct BookingController<B> {
    backend: B,
    state: BookingState,
    generations: RequestGenerations,
    veterinarians: Vec<Veterinarian>,
    pets: Vec<Pet>,
    loading_slots: bool,
    notice: Option<Notice>,
}

impl<B: BookingBackend> BookingController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: BookingState::new(),
            generations: RequestGenerations::new(),
            veterinarians: Vec::new(),
            pets: Vec::new(),
            loading_slots: false,
            notice: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// Field access for the form. The key setters report whether
    /// [`Self::refresh_availability`] should run.
    pub fn state_mut(&mut self) -> &mut BookingState {
        &mut self.state
    }

    pub fn veterinarians(&self) -> &[Veterinarian] {
        &self.veterinarians
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn slots(&self) -> &[Slot] {
        self.state.slots()
    }

    pub fn is_loading_slots(&self) -> bool {
        self.loading_slots
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Load the veterinarian and pet pickers.
    pub async fn load_options(&mut self) -> ApiResult<()> {
        match self.backend.veterinarians().await {
            Ok(vets) => self.veterinarians = vets,
            Err(e) => return report(&mut self.notice, e),
        }
        match self.backend.pets().await {
            Ok(pets) => self.pets = pets,
            Err(e) => return report(&mut self.notice, e),
        }
        Ok(())
    }

    pub fn open_new(&mut self) {
        self.generations.invalidate();
        self.loading_slots = false;
        self.notice = None;
        self.state.open_new();
    }

    /// Open `appointment` for editing. Returns `false` (with a notice) when
    /// its status no longer allows changes.
    pub fn open_edit(&mut self, appointment: &Appointment) -> bool {
        self.generations.invalidate();
        self.loading_slots = false;
        match self.state.open_edit(appointment) {
            Ok(()) => {
                self.notice = None;
                true
            }
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                false
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.generations.invalidate();
        self.loading_slots = false;
        self.state.cancel();
    }

    /// Issue a ticket for the current query key, if complete.
    pub fn begin_availability(&mut self) -> Option<(Ticket, AvailabilityQuery)> {
        let query = self.state.pending_query()?;
        let ticket = self.generations.begin();
        self.loading_slots = true;
        debug!(?ticket, vet_id = query.vet_id, date = %query.date, "availability requested");
        Some((ticket, query))
    }

    /// Apply an availability result. Superseded tickets are dropped.
    /// Returns whether the slots were replaced.
    pub fn apply_availability(
        &mut self,
        ticket: Ticket,
        query: AvailabilityQuery,
        result: ApiResult<Vec<Slot>>,
    ) -> ApiResult<bool> {
        if !self.generations.is_current(ticket) {
            debug!(?ticket, "dropping superseded availability response");
            return Ok(false);
        }
        self.loading_slots = false;
        match result {
            Ok(slots) => Ok(self.state.apply_slots(&query, slots)),
            Err(e) => report(&mut self.notice, e).map(|()| false),
        }
    }

    /// Fetch and apply availability for the current key.
    pub async fn refresh_availability(&mut self) -> ApiResult<bool> {
        let Some((ticket, query)) = self.begin_availability() else {
            return Ok(false);
        };
        let result = self.backend.availability(&query).await;
        self.apply_availability(ticket, query, result)
    }

    /// Choose the slot starting at `start`; unavailable slots are ignored.
    pub fn select_slot(&mut self, start: NaiveTime) -> bool {
        self.state.select_slot(start)
    }

    /// Validate and save the form.
    ///
    /// Missing fields never reach the network. Any failure (including a 409
    /// scheduling conflict) keeps the form open with an error notice.
    pub async fn submit(&mut self) -> ApiResult<Option<Appointment>> {
        let payload = match self.state.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return Ok(None);
            }
        };

        let result = match self.state.editing().map(|a| a.id) {
            Some(id) => self.backend.update(id, &payload).await,
            None => self.backend.create(&payload).await,
        };

        match result {
            Ok(appointment) => {
                info!(appointment_id = appointment.id, "appointment saved");
                self.generations.invalidate();
                self.loading_slots = false;
                self.state.finish();
                self.notice = Some(Notice::Success(SAVED_MESSAGE.into()));
                Ok(Some(appointment))
            }
            Err(e) => report(&mut self.notice, e).map(|()| None),
        }
    }

    /// Cancel a booked appointment after `confirm` approves it.
    pub async fn cancel_appointment(
        &mut self,
        appointment: &Appointment,
        confirm: impl FnOnce(&Appointment) -> bool,
    ) -> ApiResult<bool> {
        if !appointment.status.permits_modification() {
            let err = BookingError::NotModifiable(appointment.status.clone());
            self.notice = Some(Notice::Error(err.to_string()));
            return Ok(false);
        }
        if !confirm(appointment) {
            return Ok(false);
        }
        match self.backend.cancel(appointment.id).await {
            Ok(()) => {
                info!(appointment_id = appointment.id, "appointment cancelled");
                self.notice = Some(Notice::Success(CANCELLED_MESSAGE.into()));
                Ok(true)
            }
            Err(e) => report(&mut self.notice, e).map(|()| false),
        }
    }
}
