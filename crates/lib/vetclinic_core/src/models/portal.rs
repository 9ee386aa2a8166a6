//! Portal-only aggregates.

use serde::{Deserialize, Serialize};

use super::Id;
use super::appointment::Appointment;
use super::auth::User;
use super::clinic::{Client, Pet};

/// Customer profile: the client record plus everything hanging off it.
///
/// Fetched after login/registration and on demand; never persisted. Only
/// the `user` fragment is written back to session storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCheckoutRequest {
    pub plan_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<Id>,
}

/// Backend answer to a checkout. Payment confirmation happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCheckoutResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
