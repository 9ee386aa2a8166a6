//! Availability slots and edit-mode reconciliation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Id;
use crate::models::appointment::Appointment;
use crate::models::time;

/// Key of an availability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvailabilityQuery {
    pub vet_id: Id,
    pub date: NaiveDate,
    pub duration_minutes: u32,
}

impl AvailabilityQuery {
    /// Query-string pairs for `GET .../availability`.
    pub fn to_params(&self) -> [(&'static str, String); 3] {
        [
            ("vetId", self.vet_id.to_string()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("durationMinutes", self.duration_minutes.to_string()),
        ]
    }
}

/// Candidate appointment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "time")]
    pub start: NaiveTime,
    #[serde(with = "time")]
    pub end: NaiveTime,
    pub available: bool,
}

/// Adjust fetched slots for the appointment being edited.
///
/// The edited appointment occupies its own range, so the backend reports
/// that range as taken. When the appointment belongs to the queried vet and
/// date, its exact `(start, end)` slot is forced available, or synthesized
/// at the front when absent. The range is present exactly once afterwards.
pub fn reconcile(
    mut slots: Vec<Slot>,
    query: &AvailabilityQuery,
    editing: Option<&Appointment>,
) -> Vec<Slot> {
    let Some(appointment) =
        editing.filter(|a| a.vet_id == query.vet_id && a.date == query.date)
    else {
        return slots;
    };

    let start = appointment.time;
    let end = appointment.end_time();
    let mut found = false;
    slots.retain_mut(|slot| {
        if slot.start != start || slot.end != end {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        slot.available = true;
        true
    });

    if !found {
        debug!(
            appointment_id = appointment.id,
            start = %time::format(start),
            "own slot missing from availability, synthesizing"
        );
        slots.insert(
            0,
            Slot {
                start,
                end,
                available: true,
            },
        );
    }
    slots
}
