//! Session stores for the two authenticated audiences.
//!
//! Both stores persist through `vetclinic_core::session::PersistedSession`
//! but stay separate types: staff and customers authenticate against
//! different endpoints and the portal carries a profile the dashboard does
//! not need.

pub mod admin;
pub mod portal;

use serde::Deserialize;
use vetclinic_core::models::auth::User;

use crate::error::ApiError;

pub use admin::AdminSession;
pub use portal::PortalSession;

/// Result of a login or registration attempt. Failures carry the
/// server-supplied message instead of an error value.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success(User),
    Failed { message: String },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }
}

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Failure message for a credentials request. A 401 here means bad
/// credentials, not an expired session.
fn credential_failure(err: &ApiError) -> AuthOutcome {
    let message = match err {
        ApiError::Unauthenticated { message, .. } => message
            .clone()
            .unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.into()),
        other => other.user_message(),
    };
    AuthOutcome::Failed { message }
}

/// `GET /auth/me` answers either `{ "user": {...} }` or the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeResponse {
    Wrapped { user: User },
    Bare(User),
}

impl MeResponse {
    fn into_user(self) -> User {
        match self {
            MeResponse::Wrapped { user } | MeResponse::Bare(user) => user,
        }
    }
}

#[cfg(test)]
mod tests {
    use vetclinic_core::session::SessionDomain;

    use super::*;

    #[test]
    fn me_response_accepts_both_shapes() {
        let wrapped: MeResponse =
            serde_json::from_str(r#"{"user":{"id":1,"name":"Ana"}}"#).unwrap();
        let bare: MeResponse = serde_json::from_str(r#"{"id":1,"name":"Ana"}"#).unwrap();
        assert_eq!(wrapped.into_user(), bare.into_user());
    }

    #[test]
    fn rejected_credentials_use_server_message_or_default() {
        let err = ApiError::Unauthenticated {
            domain: SessionDomain::Admin,
            message: Some("Usuario o contraseña incorrectos".into()),
        };
        assert_eq!(
            credential_failure(&err),
            AuthOutcome::Failed {
                message: "Usuario o contraseña incorrectos".into()
            }
        );

        let err = ApiError::Unauthenticated {
            domain: SessionDomain::Admin,
            message: None,
        };
        assert_eq!(
            credential_failure(&err),
            AuthOutcome::Failed {
                message: INVALID_CREDENTIALS_MESSAGE.into()
            }
        );
    }
}
