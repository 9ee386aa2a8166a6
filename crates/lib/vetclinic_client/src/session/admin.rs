// @zen-component: SESSION-AdminStore
//
//! Staff session store.

use tokio::sync::RwLock;
use tracing::{info, warn};
use vetclinic_core::models::auth::{AuthResponse, LoginRequest, User};
use vetclinic_core::session::{PersistedSession, Route, Session, SessionDomain};

use super::{AuthOutcome, MeResponse, credential_failure};
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;

/// Staff session: bearer token plus user, persisted under the admin keys.
pub struct AdminSession {
    client: ApiClient,
    state: RwLock<Option<Session<User>>>,
}

impl AdminSession {
    /// `client` must be bound to `SessionDomain::Admin`.
    pub fn new(client: ApiClient) -> Self {
        debug_assert_eq!(client.domain(), SessionDomain::Admin);
        Self {
            client,
            state: RwLock::new(None),
        }
    }

    /// Restore a persisted session by re-fetching the current user.
    ///
    /// Any failure clears the persisted token and leaves the session empty.
    pub async fn init(&self) -> Option<User> {
        let token = match PersistedSession::token(self.client.storage(), SessionDomain::Admin) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "cannot read persisted admin session");
                return None;
            }
        };

        match self.client.get::<MeResponse>("auth/me").await {
            Ok(me) => {
                let user = me.into_user();
                if let Err(e) =
                    PersistedSession::save_user(self.client.storage(), SessionDomain::Admin, &user)
                {
                    warn!(error = %e, "cannot persist admin user");
                }
                *self.state.write().await = Some(Session {
                    token,
                    user: user.clone(),
                });
                info!(user_id = user.id, "admin session restored");
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "admin session restore failed, clearing");
                self.discard().await;
                None
            }
        }
    }

    /// Authenticate with staff credentials.
    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = match self
            .client
            .post::<AuthResponse, _>("auth/login", &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(username, error = %e, "admin login failed");
                if e.is_unauthenticated() {
                    // The client already cleared the persisted session.
                    self.expire().await;
                }
                return credential_failure(&e);
            }
        };

        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(e) = PersistedSession::save(self.client.storage(), SessionDomain::Admin, &session)
        {
            warn!(error = %e, "cannot persist admin session");
            return AuthOutcome::Failed {
                message: ApiError::from(e).user_message(),
            };
        }

        let user = session.user.clone();
        *self.state.write().await = Some(session);
        info!(user_id = user.id, "admin logged in");
        AuthOutcome::Success(user)
    }

    /// End the session and return the staff login route.
    pub async fn logout(&self) -> ApiResult<Route> {
        PersistedSession::clear(self.client.storage(), SessionDomain::Admin)?;
        *self.state.write().await = None;
        info!("admin logged out");
        Ok(SessionDomain::Admin.login_route())
    }

    /// Drop in-memory state after the client reported a 401.
    pub async fn expire(&self) {
        *self.state.write().await = None;
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }

    async fn discard(&self) {
        if let Err(e) = PersistedSession::clear(self.client.storage(), SessionDomain::Admin) {
            warn!(error = %e, "cannot clear admin session");
        }
        *self.state.write().await = None;
    }
}
