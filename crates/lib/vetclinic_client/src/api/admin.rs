//! Staff dashboard resources.

use async_trait::async_trait;
use chrono::NaiveDate;
use vetclinic_core::booking::{AvailabilityQuery, Slot};
use vetclinic_core::models::Id;
use vetclinic_core::models::appointment::{Appointment, AppointmentPayload};
use vetclinic_core::models::clinic::{
    Client, InventoryItem, Invoice, MedicalRecord, Payment, Pet, Plan, Subscription, Vaccination,
    Veterinarian,
};

use super::{BookingBackend, Crud, fetch_availability};
use crate::error::ApiResult;
use crate::http::ApiClient;

/// All staff-facing resources, sharing the admin client.
#[derive(Clone)]
pub struct AdminApi {
    pub clients: Crud<Client>,
    pub pets: PetsApi,
    pub appointments: AppointmentsApi,
    pub inventory: InventoryApi,
    pub invoices: InvoicesApi,
    pub plans: Crud<Plan>,
    pub subscriptions: Crud<Subscription>,
    pub medical: MedicalApi,
    pub vaccinations: VaccinationsApi,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            clients: Crud::new(client.clone(), "clients"),
            pets: PetsApi::new(client.clone()),
            appointments: AppointmentsApi::new(client.clone()),
            inventory: InventoryApi::new(client.clone()),
            invoices: InvoicesApi::new(client.clone()),
            plans: Crud::new(client.clone(), "plans"),
            subscriptions: Crud::new(client.clone(), "subscriptions"),
            medical: MedicalApi::new(client.clone()),
            vaccinations: VaccinationsApi::new(client),
        }
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PetsApi {
    client: ApiClient,
    pub records: Crud<Pet>,
}

impl PetsApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client.clone(), "pets"),
            client,
        }
    }

    /// Pets owned by one client.
    pub async fn for_client(&self, client_id: Id) -> ApiResult<Vec<Pet>> {
        self.client
            .get_query("pets", &[("clientId", client_id.to_string())])
            .await
    }
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppointmentsApi {
    client: ApiClient,
    pub records: Crud<Appointment, AppointmentPayload>,
}

impl AppointmentsApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client.clone(), "appointments"),
            client,
        }
    }

    /// Appointments scheduled on `date`.
    pub async fn on_date(&self, date: NaiveDate) -> ApiResult<Vec<Appointment>> {
        self.client
            .get_query(
                "appointments",
                &[("date", date.format("%Y-%m-%d").to_string())],
            )
            .await
    }

    pub async fn veterinarians(&self) -> ApiResult<Vec<Veterinarian>> {
        self.client.get("appointments/veterinarians").await
    }

    pub async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Vec<Slot>> {
        fetch_availability(&self.client, "appointments/availability", query).await
    }
}

#[async_trait]
impl BookingBackend for AppointmentsApi {
    async fn veterinarians(&self) -> ApiResult<Vec<Veterinarian>> {
        AppointmentsApi::veterinarians(self).await
    }

    async fn pets(&self) -> ApiResult<Vec<Pet>> {
        self.client.get("pets").await
    }

    async fn availability(&self, query: &AvailabilityQuery) -> ApiResult<Vec<Slot>> {
        AppointmentsApi::availability(self, query).await
    }

    async fn create(&self, payload: &AppointmentPayload) -> ApiResult<Appointment> {
        self.records.create(payload).await
    }

    async fn update(&self, id: Id, payload: &AppointmentPayload) -> ApiResult<Appointment> {
        self.records.update(id, payload).await
    }

    async fn cancel(&self, id: Id) -> ApiResult<()> {
        self.records.delete(id).await
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InventoryApi {
    pub records: Crud<InventoryItem>,
}

impl InventoryApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client, "inventory"),
        }
    }

    /// Items at or below their minimum stock. Filtered client-side over the
    /// full inventory listing.
    pub async fn low_stock(&self) -> ApiResult<Vec<InventoryItem>> {
        let items = self.records.list().await?;
        Ok(items.into_iter().filter(is_low_stock).collect())
    }
}

fn is_low_stock(item: &InventoryItem) -> bool {
    item.min_stock.is_some_and(|min| item.quantity <= min)
}

// ---------------------------------------------------------------------------
// Invoices & payments
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InvoicesApi {
    client: ApiClient,
    pub records: Crud<Invoice>,
}

impl InvoicesApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client.clone(), "invoices"),
            client,
        }
    }

    pub async fn payments(&self, invoice_id: Id) -> ApiResult<Vec<Payment>> {
        self.client
            .get(&format!("invoices/{invoice_id}/payments"))
            .await
    }

    /// Register a payment; the backend recomputes the balance.
    pub async fn add_payment(&self, invoice_id: Id, payment: &Payment) -> ApiResult<Payment> {
        self.client
            .post(&format!("invoices/{invoice_id}/payments"), payment)
            .await
    }

    /// Rendered invoice document as produced by the backend.
    pub async fn pdf(&self, invoice_id: Id) -> ApiResult<Vec<u8>> {
        self.client
            .get_bytes(&format!("invoices/{invoice_id}/pdf"))
            .await
    }
}

// ---------------------------------------------------------------------------
// Medical records & vaccinations
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MedicalApi {
    client: ApiClient,
    pub records: Crud<MedicalRecord>,
}

impl MedicalApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client.clone(), "medical/records"),
            client,
        }
    }

    pub async fn records_for_pet(&self, pet_id: Id) -> ApiResult<Vec<MedicalRecord>> {
        self.client
            .get(&format!("medical/pets/{pet_id}/records"))
            .await
    }
}

#[derive(Clone)]
pub struct VaccinationsApi {
    client: ApiClient,
    pub records: Crud<Vaccination>,
}

impl VaccinationsApi {
    fn new(client: ApiClient) -> Self {
        Self {
            records: Crud::new(client.clone(), "vaccinations"),
            client,
        }
    }

    pub async fn for_pet(&self, pet_id: Id) -> ApiResult<Vec<Vaccination>> {
        self.client.get(&format!("vaccinations/pet/{pet_id}")).await
    }

    /// Vaccinations whose next dose is coming due.
    pub async fn upcoming(&self) -> ApiResult<Vec<Vaccination>> {
        self.client.get("vaccinations/upcoming").await
    }
}
