//! In-process fake of the clinic backend, served over real HTTP.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use vetclinic_client::{AppContext, ClientConfig};
use vetclinic_core::storage::MemoryStorage;

pub const STAFF_TOKEN: &str = "staff-token";
pub const PORTAL_TOKEN: &str = "portal-token";
pub const PASSWORD: &str = "secret";
pub const CONFLICT_MESSAGE: &str = "Horario no disponible";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4 fake invoice";

/// Call counters and behaviour switches shared with the handlers.
#[derive(Default)]
pub struct Backend {
    pub profile_calls: AtomicUsize,
    pub availability_calls: AtomicUsize,
    pub appointment_writes: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    pub conflict: AtomicBool,
    pub profile_fails: AtomicBool,
}

impl Backend {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Arc<Backend>,
}

impl TestServer {
    pub async fn start() -> Self {
        let backend = Arc::new(Backend::default());
        let app = Router::new()
            .route("/api/auth/login", post(staff_login))
            .route("/api/auth/me", get(staff_me))
            .route("/api/clients", get(staff_clients))
            .route("/api/pets", get(staff_pets))
            .route("/api/inventory", get(inventory))
            .route("/api/invoices/{id}/payments", post(add_payment))
            .route("/api/invoices/{id}/pdf", get(invoice_pdf))
            .route("/api/portal/plans/checkout", post(plan_checkout))
            .route("/api/portal/auth/login", post(portal_login))
            .route("/api/portal/auth/register", post(portal_register))
            .route("/api/portal/profile", get(portal_profile))
            .route("/api/portal/pets", get(portal_pets))
            .route(
                "/api/portal/appointments/veterinarians",
                get(veterinarians),
            )
            .route("/api/portal/appointments/availability", get(availability))
            .route("/api/portal/appointments", post(create_appointment))
            .route(
                "/api/portal/appointments/{id}",
                put(update_appointment).delete(cancel_appointment),
            )
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake backend");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            backend,
        }
    }

    /// A context over fresh in-memory storage.
    pub fn context(&self) -> AppContext {
        let config = ClientConfig::new(&self.base_url).expect("config");
        AppContext::new(config, Arc::new(MemoryStorage::new())).expect("context")
    }
}

type Shared = State<Arc<Backend>>;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

fn staff_user() -> Value {
    json!({ "id": 1, "name": "Ana Staff", "email": "ana@clinic.test", "role": "admin" })
}

fn portal_user() -> Value {
    json!({ "id": 7, "name": "Carla Cliente", "email": "carla@example.com" })
}

async fn staff_login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({ "token": STAFF_TOKEN, "user": staff_user() })).into_response()
    } else {
        unauthorized("Credenciales inválidas")
    }
}

async fn staff_me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(STAFF_TOKEN) => Json(json!({ "user": staff_user() })).into_response(),
        _ => unauthorized("Token inválido"),
    }
}

async fn staff_clients(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(STAFF_TOKEN) => Json(json!([{ "id": 2, "name": "Carla Cliente" }])).into_response(),
        _ => unauthorized("Token inválido"),
    }
}

async fn portal_login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({ "token": PORTAL_TOKEN, "user": portal_user() })).into_response()
    } else {
        unauthorized("Credenciales inválidas")
    }
}

async fn portal_register(Json(body): Json<Value>) -> Response {
    let user = json!({ "id": 8, "name": body["name"], "email": body["email"] });
    (
        StatusCode::CREATED,
        Json(json!({ "token": PORTAL_TOKEN, "user": user })),
    )
        .into_response()
}

async fn portal_profile(State(backend): Shared, headers: HeaderMap) -> Response {
    backend.profile_calls.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) != Some(PORTAL_TOKEN) {
        return unauthorized("Token inválido");
    }
    if backend.profile_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "db down" })),
        )
            .into_response();
    }
    Json(json!({
        "user": { "id": 7, "name": "Carla Cliente", "email": "carla@example.com", "role": "client" },
        "client": { "id": 2, "name": "Carla Cliente" },
        "pets": [{ "id": 8, "name": "Luna", "species": "perro" }],
        "appointments": []
    }))
    .into_response()
}

async fn portal_pets(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(PORTAL_TOKEN) => {
            Json(json!([{ "id": 8, "clientId": 2, "name": "Luna", "species": "perro" }]))
                .into_response()
        }
        _ => unauthorized("Token inválido"),
    }
}

async fn veterinarians() -> Json<Value> {
    Json(json!([{ "id": 3, "name": "Dra. López", "specialty": "general" }]))
}

/// Vet 3 on 2025-04-10 reports its 09:00 slot as taken.
async fn availability(
    State(backend): Shared,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    backend.availability_calls.fetch_add(1, Ordering::SeqCst);
    let taken = params.get("vetId").map(String::as_str) == Some("3")
        && params.get("date").map(String::as_str) == Some("2025-04-10");
    Json(json!({
        "slots": [
            { "start": "09:00", "end": "09:30", "available": !taken },
            { "start": "09:30", "end": "10:00", "available": true },
            { "start": "10:00", "end": "10:30", "available": true }
        ]
    }))
}

fn saved(id: i64, payload: &Value) -> Value {
    let mut record = payload.clone();
    record["id"] = json!(id);
    record["status"] = json!("programada");
    record
}

async fn create_appointment(State(backend): Shared, Json(payload): Json<Value>) -> Response {
    backend.appointment_writes.fetch_add(1, Ordering::SeqCst);
    if backend.conflict.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": CONFLICT_MESSAGE })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(saved(100, &payload))).into_response()
}

async fn update_appointment(
    State(backend): Shared,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Response {
    backend.appointment_writes.fetch_add(1, Ordering::SeqCst);
    if backend.conflict.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": CONFLICT_MESSAGE })),
        )
            .into_response();
    }
    Json(saved(id, &payload)).into_response()
}

async fn cancel_appointment(State(backend): Shared, Path(_id): Path<i64>) -> StatusCode {
    backend.cancel_calls.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

fn staff_only(headers: &HeaderMap) -> Option<Response> {
    match bearer(headers) {
        Some(STAFF_TOKEN) => None,
        _ => Some(unauthorized("Token inválido")),
    }
}

async fn staff_pets(
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Response {
    if let Some(denied) = staff_only(&headers) {
        return denied;
    }
    let pets = json!([
        { "id": 8, "clientId": 2, "name": "Luna", "species": "perro" },
        { "id": 9, "clientId": 4, "name": "Michi", "species": "gato" }
    ]);
    let pets: Vec<Value> = match params.get("clientId") {
        Some(client) => pets
            .as_array()
            .into_iter()
            .flatten()
            .filter(|p| p["clientId"].to_string() == *client)
            .cloned()
            .collect(),
        None => pets.as_array().cloned().unwrap_or_default(),
    };
    Json(Value::Array(pets)).into_response()
}

async fn inventory(headers: HeaderMap) -> Response {
    if let Some(denied) = staff_only(&headers) {
        return denied;
    }
    Json(json!([
        { "id": 1, "name": "Amoxicilina", "quantity": 2, "minStock": 5 },
        { "id": 2, "name": "Gasas", "quantity": 40, "minStock": 10 },
        { "id": 3, "name": "Collar", "quantity": 0 }
    ]))
    .into_response()
}

async fn add_payment(
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(mut payment): Json<Value>,
) -> Response {
    if let Some(denied) = staff_only(&headers) {
        return denied;
    }
    payment["id"] = json!(31);
    (StatusCode::CREATED, Json(payment)).into_response()
}

async fn invoice_pdf(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(denied) = staff_only(&headers) {
        return denied;
    }
    if id != 12 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Factura no encontrada" })))
            .into_response();
    }
    ([("content-type", "application/pdf")], PDF_BYTES).into_response()
}

async fn plan_checkout(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != Some(PORTAL_TOKEN) {
        return unauthorized("Token inválido");
    }
    Json(json!({
        "subscriptionId": 40,
        "checkoutUrl": format!("https://pay.test/checkout/{}", body["planId"]),
        "status": "pending"
    }))
    .into_response()
}
