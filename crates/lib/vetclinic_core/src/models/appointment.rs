//! Appointment models.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Id, time};

/// Duration used when neither the form nor the backend supplies one.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Lifecycle status. The backend may assign values beyond the known ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    #[default]
    Programada,
    Confirmada,
    Completada,
    Cancelada,
    Other(String),
}

impl AppointmentStatus {
    /// Whether the customer may still edit or cancel the appointment.
    pub fn permits_modification(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Programada | AppointmentStatus::Confirmada
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Programada => "programada",
            AppointmentStatus::Confirmada => "confirmada",
            AppointmentStatus::Completada => "completada",
            AppointmentStatus::Cancelada => "cancelada",
            AppointmentStatus::Other(s) => s,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "programada" => AppointmentStatus::Programada,
            "confirmada" => AppointmentStatus::Confirmada,
            "completada" => AppointmentStatus::Completada,
            "cancelada" => AppointmentStatus::Cancelada,
            _ => AppointmentStatus::Other(raw),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentType {
    #[default]
    Consulta,
    Vacunacion,
    Cirugia,
    Control,
    Emergencia,
    Other(String),
}

impl AppointmentType {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentType::Consulta => "consulta",
            AppointmentType::Vacunacion => "vacunacion",
            AppointmentType::Cirugia => "cirugia",
            AppointmentType::Control => "control",
            AppointmentType::Emergencia => "emergencia",
            AppointmentType::Other(s) => s,
        }
    }
}

impl From<String> for AppointmentType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "consulta" => AppointmentType::Consulta,
            "vacunacion" => AppointmentType::Vacunacion,
            "cirugia" => AppointmentType::Cirugia,
            "control" => AppointmentType::Control,
            "emergencia" => AppointmentType::Emergencia,
            _ => AppointmentType::Other(raw),
        }
    }
}

impl From<AppointmentType> for String {
    fn from(kind: AppointmentType) -> Self {
        match kind {
            AppointmentType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Id,
    pub pet_id: Id,
    pub vet_id: Id,
    pub date: NaiveDate,
    #[serde(with = "time")]
    pub time: NaiveTime,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    pub reason: String,
    #[serde(rename = "type", default)]
    pub kind: AppointmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_name: Option<String>,
}

impl Appointment {
    /// End of the booked range (`time + duration_minutes`).
    pub fn end_time(&self) -> NaiveTime {
        self.time + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Body of `POST`/`PUT` appointment requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub pet_id: Id,
    pub vet_id: Id,
    pub date: NaiveDate,
    #[serde(with = "time")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
