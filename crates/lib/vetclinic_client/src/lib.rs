//! # vetclinic_client
//!
//! HTTP clients, session stores and view-models for the VetClinic API.
//!
//! [`AppContext`] wires one [`ApiClient`] per session domain (staff and
//! customer portal) over a shared [`SessionStorage`], the matching session
//! stores, and the typed resource APIs.
//!
//! [`SessionStorage`]: vetclinic_core::storage::SessionStorage

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod session;
pub mod views;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use session::{AdminSession, AuthOutcome, PortalSession};
pub use views::{BookingController, ListView, Notice};
