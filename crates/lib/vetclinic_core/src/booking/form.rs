//! Booking form state machine.
//!
//! `Idle` → `EditingNew` / `EditingExisting` on explicit user action, back
//! to `Idle` on cancel or after a successful submit.

use chrono::{NaiveDate, NaiveTime};

use super::slots::{AvailabilityQuery, Slot, reconcile};
use super::{BookingError, FormField};
use crate::models::Id;
use crate::models::appointment::{
    Appointment, AppointmentPayload, AppointmentType, DEFAULT_DURATION_MINUTES,
};

/// What the form is currently doing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormMode {
    #[default]
    Idle,
    EditingNew,
    EditingExisting(Appointment),
}

/// Raw form fields. Empty means unset.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub pet_id: Option<Id>,
    pub vet_id: Option<Id>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub reason: String,
    pub kind: AppointmentType,
    pub notes: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            pet_id: None,
            vet_id: None,
            date: None,
            time: None,
            duration_minutes: Some(DEFAULT_DURATION_MINUTES),
            reason: String::new(),
            kind: AppointmentType::default(),
            notes: String::new(),
        }
    }
}

impl BookingForm {
    /// Prefill from an existing appointment.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            pet_id: Some(appointment.pet_id),
            vet_id: Some(appointment.vet_id),
            date: Some(appointment.date),
            time: Some(appointment.time),
            duration_minutes: Some(appointment.duration_minutes),
            reason: appointment.reason.clone(),
            kind: appointment.kind.clone(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    /// Availability key, once vet, date and duration are all set.
    pub fn query(&self) -> Option<AvailabilityQuery> {
        Some(AvailabilityQuery {
            vet_id: self.vet_id?,
            date: self.date?,
            duration_minutes: self.duration_minutes.filter(|d| *d > 0)?,
        })
    }

    /// Check required fields and build the request body.
    pub fn validate(&self) -> Result<AppointmentPayload, BookingError> {
        let reason = self.reason.trim();
        let mut missing = Vec::new();
        if self.pet_id.is_none() {
            missing.push(FormField::Pet);
        }
        if self.vet_id.is_none() {
            missing.push(FormField::Vet);
        }
        if self.date.is_none() {
            missing.push(FormField::Date);
        }
        if self.time.is_none() {
            missing.push(FormField::Time);
        }
        if reason.is_empty() {
            missing.push(FormField::Reason);
        }

        match (self.pet_id, self.vet_id, self.date, self.time) {
            (Some(pet_id), Some(vet_id), Some(date), Some(time)) if missing.is_empty() => {
                let notes = self.notes.trim();
                Ok(AppointmentPayload {
                    pet_id,
                    vet_id,
                    date,
                    time,
                    duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
                    reason: reason.to_string(),
                    kind: self.kind.clone(),
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                })
            }
            _ => Err(BookingError::MissingFields(missing)),
        }
    }
}

/// Form mode, field values and the slots shown for the current query.
#[derive(Debug, Clone, Default)]
pub struct BookingState {
    mode: FormMode,
    form: BookingForm,
    slots: Vec<Slot>,
}

impl BookingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.mode, FormMode::Idle)
    }

    /// The appointment under edit, if any.
    pub fn editing(&self) -> Option<&Appointment> {
        match &self.mode {
            FormMode::EditingExisting(appointment) => Some(appointment),
            _ => None,
        }
    }

    /// Start a new booking with an empty form.
    pub fn open_new(&mut self) {
        self.mode = FormMode::EditingNew;
        self.form = BookingForm::default();
        self.slots.clear();
    }

    /// Start editing `appointment`. Refused once its status is final.
    pub fn open_edit(&mut self, appointment: &Appointment) -> Result<(), BookingError> {
        if !appointment.status.permits_modification() {
            return Err(BookingError::NotModifiable(appointment.status.clone()));
        }
        self.form = BookingForm::from_appointment(appointment);
        self.mode = FormMode::EditingExisting(appointment.clone());
        self.slots.clear();
        Ok(())
    }

    /// Abandon the form.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Close the form after a successful submit.
    pub fn finish(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.mode = FormMode::Idle;
        self.form = BookingForm::default();
        self.slots.clear();
    }

    /// Availability query to run now, if the form is open and keyed.
    pub fn pending_query(&self) -> Option<AvailabilityQuery> {
        if self.is_open() {
            self.form.query()
        } else {
            None
        }
    }

    pub fn set_pet(&mut self, pet_id: Option<Id>) {
        self.form.pet_id = pet_id;
    }

    /// Returns `true` when availability must be re-fetched.
    pub fn set_vet(&mut self, vet_id: Option<Id>) -> bool {
        self.update_key(|form| form.vet_id = vet_id)
    }

    /// Returns `true` when availability must be re-fetched.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.update_key(|form| form.date = date)
    }

    /// Returns `true` when availability must be re-fetched.
    pub fn set_duration(&mut self, duration_minutes: Option<u32>) -> bool {
        self.update_key(|form| form.duration_minutes = duration_minutes)
    }

    pub fn set_time(&mut self, time: Option<NaiveTime>) {
        self.form.time = time;
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.form.reason = reason.into();
    }

    pub fn set_kind(&mut self, kind: AppointmentType) {
        self.form.kind = kind;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.form.notes = notes.into();
    }

    fn update_key(&mut self, f: impl FnOnce(&mut BookingForm)) -> bool {
        let before = self.form.query();
        f(&mut self.form);
        let after = self.form.query();
        if before != after {
            self.slots.clear();
            // A chosen time only holds for the key it was picked under.
            self.form.time = None;
        }
        self.is_open() && after.is_some() && before != after
    }

    /// Store fetched slots for `query`, reconciled against the edited
    /// appointment. Slots for a query that no longer matches the form are
    /// dropped; returns whether they were applied.
    pub fn apply_slots(&mut self, query: &AvailabilityQuery, fetched: Vec<Slot>) -> bool {
        if self.pending_query().as_ref() != Some(query) {
            return false;
        }
        self.slots = reconcile(fetched, query, self.editing());
        true
    }

    /// Pick the slot starting at `start`. Unavailable or unknown slots are a
    /// no-op; returns whether the selection changed the form.
    pub fn select_slot(&mut self, start: NaiveTime) -> bool {
        let available = self
            .slots
            .iter()
            .any(|slot| slot.start == start && slot.available);
        if available {
            self.form.time = Some(start);
        }
        available
    }

    /// Validate the open form.
    pub fn validate(&self) -> Result<AppointmentPayload, BookingError> {
        if !self.is_open() {
            return Err(BookingError::NoOpenForm);
        }
        self.form.validate()
    }
}
