//! Resource APIs over the two HTTP clients.
//!
//! `AdminApi` covers the staff dashboard resources, `PortalApi` the
//! customer-scoped mirrors under `/portal`. Both implement
//! [`BookingBackend`] so one booking controller serves either screen.

pub mod admin;
pub mod portal;

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vetclinic_core::booking::{AvailabilityQuery, Slot};
use vetclinic_core::models::Id;
use vetclinic_core::models::appointment::{Appointment, AppointmentPayload};
use vetclinic_core::models::clinic::{Pet, Veterinarian};

use crate::error::ApiResult;
use crate::http::ApiClient;

pub use admin::AdminApi;
pub use portal::PortalApi;

/// List/get/create/update/delete over one collection path.
///
/// `T` is the record read back, `B` the body sent on create and update.
pub struct Crud<T, B = T> {
    client: ApiClient,
    path: &'static str,
    _marker: PhantomData<fn() -> (T, B)>,
}

impl<T, B> Clone for Crud<T, B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            _marker: PhantomData,
        }
    }
}

impl<T, B> Crud<T, B>
where
    T: DeserializeOwned,
    B: Serialize + Sync,
{
    pub fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn item_path(&self, id: Id) -> String {
        format!("{}/{id}", self.path)
    }

    pub async fn list(&self) -> ApiResult<Vec<T>> {
        self.client.get(self.path).await
    }

    pub async fn get(&self, id: Id) -> ApiResult<T> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn create(&self, body: &B) -> ApiResult<T> {
        self.client.post(self.path, body).await
    }

    pub async fn update(&self, id: Id, body: &B) -> ApiResult<T> {
        self.client.put(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: Id) -> ApiResult<()> {
        self.client.delete(&self.item_path(id)).await
    }
}

/// Availability answers either a bare slot list or `{ "slots": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlotsResponse {
    Bare(Vec<Slot>),
    Wrapped { slots: Vec<Slot> },
}

impl SlotsResponse {
    fn into_slots(self) -> Vec<Slot> {
        match self {
            SlotsResponse::Bare(slots) | SlotsResponse::Wrapped { slots } => slots,
        }
    }
}

async fn fetch_availability(
    client: &ApiClient,
    path: &str,
    query: &AvailabilityQuery,
) -> ApiResult<Vec<Slot>> {
    let response: SlotsResponse = client.get_query(path, &query.to_params()).await?;
    Ok(response.into_slots())
}

/// Endpoints the booking controller needs, whichever audience it serves.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn veterinarians(&self) -> ApiResult<Vec<Veterinarian>>;

    async fn pets(&self) -> ApiResult<Vec<Pet>>;

    async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Vec<Slot>>;

    async fn create(&self, payload: &AppointmentPayload) -> ApiResult<Appointment>;

    async fn update(&self, id: Id, payload: &AppointmentPayload) -> ApiResult<Appointment>;

    async fn cancel(&self, id: Id) -> ApiResult<()>;
}
