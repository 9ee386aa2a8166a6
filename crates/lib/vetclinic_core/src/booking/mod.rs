// @zen-component: BOOKING-Core
//
//! Appointment booking: form state machine, availability reconciliation and
//! request generations.
//!
//! Everything here is synchronous and I/O free. The async controller in
//! `vetclinic_client::views::booking` drives it against an HTTP backend.

pub mod form;
pub mod generation;
pub mod slots;

use std::fmt;

use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

pub use form::{BookingForm, BookingState, FormMode};
pub use generation::{RequestGenerations, Ticket};
pub use slots::{AvailabilityQuery, Slot, reconcile};

/// Required booking form fields, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Pet,
    Vet,
    Date,
    Time,
    Reason,
}

impl FormField {
    /// API field name.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Pet => "petId",
            FormField::Vet => "vetId",
            FormField::Date => "date",
            FormField::Time => "time",
            FormField::Reason => "reason",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking errors raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("Missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<FormField>),

    #[error("Appointment with status '{0}' can no longer be modified")]
    NotModifiable(AppointmentStatus),

    #[error("No booking form is open")]
    NoOpenForm,
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
