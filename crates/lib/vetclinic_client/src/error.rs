//! Client error types.
//!
//! Every request outcome that is not a success lands in one `ApiError`
//! variant. Views turn it into a notice with [`ApiError::user_message`];
//! only `Unauthenticated` is meant to travel up to the composition root.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use vetclinic_core::session::SessionDomain;
use vetclinic_core::storage::StorageError;

/// Convenience alias for client return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback when the server gave no usable message.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
const CONFLICT_MESSAGE: &str = "The selected time slot is no longer available.";
const NETWORK_MESSAGE: &str = "Could not reach the server. Check your connection and try again.";

/// Request failures with HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the domain's persisted session has already been cleared.
    #[error("Unauthenticated: {domain} session rejected")]
    Unauthenticated {
        domain: SessionDomain,
        message: Option<String>,
    },

    /// 409: e.g. an overlapping booking.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx, typically validation.
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error body shape returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    error: Option<String>,
}

/// Extract the server-supplied message from an error body, if any.
pub fn message_from_body(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    payload
        .message
        .or(payload.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

impl ApiError {
    /// Map a non-success, non-401 response to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = message_from_body(body);
        match status {
            StatusCode::CONFLICT => {
                ApiError::Conflict(message.unwrap_or_else(|| CONFLICT_MESSAGE.into()))
            }
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(message.unwrap_or_else(|| "resource not found".into()))
            }
            s if s.is_client_error() => ApiError::Rejected {
                status: s.as_u16(),
                message: message.unwrap_or_else(|| GENERIC_MESSAGE.into()),
            },
            s => ApiError::Server {
                status: s.as_u16(),
                message: message.unwrap_or_else(|| GENERIC_MESSAGE.into()),
            },
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated { .. })
    }

    /// Non-empty text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated { message, .. } => message
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.into()),
            ApiError::Conflict(m) | ApiError::NotFound(m) => m.clone(),
            ApiError::Rejected { message, .. } | ApiError::Server { message, .. } => {
                message.clone()
            }
            ApiError::Network(_) => NETWORK_MESSAGE.into(),
            ApiError::Config(m) => m.clone(),
            ApiError::Decode(_) | ApiError::Storage(_) => GENERIC_MESSAGE.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_message_then_error() {
        assert_eq!(
            message_from_body(r#"{"message":"Fecha inválida","error":"bad_request"}"#).as_deref(),
            Some("Fecha inválida")
        );
        assert_eq!(
            message_from_body(r#"{"error":"Horario ocupado"}"#).as_deref(),
            Some("Horario ocupado")
        );
        assert_eq!(message_from_body(r#"{"message":"  "}"#), None);
        assert_eq!(message_from_body("<html>502</html>"), None);
    }

    #[test]
    fn conflict_keeps_server_message() {
        let err = ApiError::from_status(StatusCode::CONFLICT, r#"{"message":"Slot taken"}"#);
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Slot taken"));
        assert_eq!(err.user_message(), "Slot taken");
    }

    #[test]
    fn conflict_without_body_has_fallback() {
        let err = ApiError::from_status(StatusCode::CONFLICT, "");
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn client_and_server_errors_are_split() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "{}");
        assert!(matches!(err, ApiError::Rejected { status: 422, .. }));
        assert_eq!(err.user_message(), GENERIC_MESSAGE);

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ApiError::Server { status: 502, .. }));
    }

    #[test]
    fn every_variant_has_a_user_message() {
        let errors = [
            ApiError::Unauthenticated {
                domain: SessionDomain::Portal,
                message: None,
            },
            ApiError::Network("connection refused".into()),
            ApiError::Decode("eof".into()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
    }
}
