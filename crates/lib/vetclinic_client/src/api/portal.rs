//! Customer portal resources, scoped server-side to the signed-in client.

use async_trait::async_trait;
use vetclinic_core::booking::{AvailabilityQuery, Slot};
use vetclinic_core::models::Id;
use vetclinic_core::models::appointment::{Appointment, AppointmentPayload};
use vetclinic_core::models::clinic::{Invoice, Pet, Plan, Subscription, Veterinarian};
use vetclinic_core::models::portal::{PlanCheckoutRequest, PlanCheckoutResponse};

use super::{BookingBackend, Crud, fetch_availability};
use crate::error::ApiResult;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct PortalApi {
    client: ApiClient,
    pub appointments: Crud<Appointment, AppointmentPayload>,
    pub pets: Crud<Pet>,
}

impl PortalApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            appointments: Crud::new(client.clone(), "portal/appointments"),
            pets: Crud::new(client.clone(), "portal/pets"),
            client,
        }
    }

    pub async fn veterinarians(&self) -> ApiResult<Vec<Veterinarian>> {
        self.client.get("portal/appointments/veterinarians").await
    }

    pub async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Vec<Slot>> {
        fetch_availability(&self.client, "portal/appointments/availability", query).await
    }

    pub async fn plans(&self) -> ApiResult<Vec<Plan>> {
        self.client.get("portal/plans").await
    }

    /// Start a plan purchase. Payment is confirmed server-side.
    pub async fn checkout(&self, request: &PlanCheckoutRequest) -> ApiResult<PlanCheckoutResponse> {
        self.client.post("portal/plans/checkout", request).await
    }

    pub async fn subscriptions(&self) -> ApiResult<Vec<Subscription>> {
        self.client.get("portal/subscriptions").await
    }

    pub async fn invoices(&self) -> ApiResult<Vec<Invoice>> {
        self.client.get("portal/invoices").await
    }
}

#[async_trait]
impl BookingBackend for PortalApi {
    async fn veterinarians(&self) -> ApiResult<Vec<Veterinarian>> {
        PortalApi::veterinarians(self).await
    }

    async fn pets(&self) -> ApiResult<Vec<Pet>> {
        self.pets.list().await
    }

    async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Vec<Slot>> {
        PortalApi::availability(self, query).await
    }

    async fn create(&self, payload: &AppointmentPayload) -> ApiResult<Appointment> {
        self.appointments.create(payload).await
    }

    async fn update(&self, id: Id, payload: &AppointmentPayload) -> ApiResult<Appointment> {
        self.appointments.update(id, payload).await
    }

    async fn cancel(&self, id: Id) -> ApiResult<()> {
        self.appointments.delete(id).await
    }
}
