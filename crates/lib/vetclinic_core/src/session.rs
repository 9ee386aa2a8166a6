// @zen-component: SESSION-Domains
//
//! Session domains and their persisted state.
//!
//! Staff and portal customers authenticate independently. Each domain owns
//! its own pair of storage keys and its own login route, so clearing one
//! session never touches the other.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{SessionStorage, StorageError, load_json, save_json};

/// Which authenticated audience a client or store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionDomain {
    /// Clinic staff dashboard.
    Admin,
    /// End-customer self-service portal.
    Portal,
}

impl SessionDomain {
    /// Storage key of the bearer token.
    pub fn token_key(self) -> &'static str {
        match self {
            SessionDomain::Admin => "token",
            SessionDomain::Portal => "portal_token",
        }
    }

    /// Storage key of the JSON-serialized user.
    pub fn user_key(self) -> &'static str {
        match self {
            SessionDomain::Admin => "user",
            SessionDomain::Portal => "portal_user",
        }
    }

    /// Where navigation lands when this domain's session ends.
    pub fn login_route(self) -> Route {
        match self {
            SessionDomain::Admin => Route::StaffLogin,
            SessionDomain::Portal => Route::PortalLogin,
        }
    }
}

impl fmt::Display for SessionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionDomain::Admin => f.write_str("admin"),
            SessionDomain::Portal => f.write_str("portal"),
        }
    }
}

/// Navigation targets the session layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StaffLogin,
    PortalLogin,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::StaffLogin => "/login",
            Route::PortalLogin => "/portal/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Bearer token plus cached identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<U> {
    pub token: String,
    pub user: U,
}

/// Persistence helpers shared by the admin and portal stores.
pub struct PersistedSession;

impl PersistedSession {
    /// Persisted token for `domain`, if any.
    pub fn token(
        storage: &dyn SessionStorage,
        domain: SessionDomain,
    ) -> Result<Option<String>, StorageError> {
        Ok(storage
            .get(domain.token_key())?
            .filter(|token| !token.is_empty()))
    }

    /// Persisted token and user. `None` unless both are present and decodable.
    pub fn load<U: DeserializeOwned>(
        storage: &dyn SessionStorage,
        domain: SessionDomain,
    ) -> Result<Option<Session<U>>, StorageError> {
        let Some(token) = Self::token(storage, domain)? else {
            return Ok(None);
        };
        Ok(load_json::<U>(storage, domain.user_key())?.map(|user| Session { token, user }))
    }

    /// Persist a full session.
    pub fn save<U: Serialize>(
        storage: &dyn SessionStorage,
        domain: SessionDomain,
        session: &Session<U>,
    ) -> Result<(), StorageError> {
        storage.set(domain.token_key(), &session.token)?;
        Self::save_user(storage, domain, &session.user)
    }

    /// Persist only the user entry.
    pub fn save_user<U: Serialize>(
        storage: &dyn SessionStorage,
        domain: SessionDomain,
        user: &U,
    ) -> Result<(), StorageError> {
        save_json(storage, domain.user_key(), user)
    }

    /// Remove both entries for `domain`.
    pub fn clear(storage: &dyn SessionStorage, domain: SessionDomain) -> Result<(), StorageError> {
        // Both removals are attempted; the first failure is reported.
        let token = storage.remove(domain.token_key());
        let user = storage.remove(domain.user_key());
        token.and(user)
    }
}
