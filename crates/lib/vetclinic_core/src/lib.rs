//! # vetclinic_core
//!
//! Domain logic for the VetClinic client: wire models, persisted session
//! storage, session domains, and the appointment booking state machine.

pub mod booking;
pub mod models;
pub mod session;
pub mod storage;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
