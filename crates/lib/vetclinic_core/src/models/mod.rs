//! Wire models shared with the clinic API.
//!
//! Field names follow the API's camelCase JSON. Entities other than
//! appointments are plain records: the backend owns all validation.

pub mod appointment;
pub mod auth;
pub mod clinic;
pub mod portal;
pub mod time;

/// Backend-assigned numeric identifier.
pub type Id = i64;
