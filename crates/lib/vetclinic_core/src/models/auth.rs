//! Authentication models.
//!
//! The admin and portal domains share the `User` shape; the portal only adds
//! a registration request and a richer profile (see `portal`).

use serde::{Deserialize, Serialize};

use super::Id;

/// Authenticated identity cached next to the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Staff credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Customer credentials for `POST /portal/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct PortalLoginRequest {
    pub email: String,
    pub password: String,
}

/// Customer self-registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Successful login or registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id": 4, "name": "Dr. Vega"}"#).unwrap();
        assert_eq!(user.id, 4);
        assert!(user.email.is_none());
        assert!(user.role.is_none());
    }

    #[test]
    fn auth_response_parses() {
        let raw = r#"{"token":"t-1","user":{"id":1,"name":"Ana","email":"a@b.c","role":"admin"}}"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.token, "t-1");
        assert_eq!(resp.user.role.as_deref(), Some("admin"));
    }
}
