// @zen-component: SESSION-PortalStore
//
//! Customer portal session store.
//!
//! Same persistence contract as the staff store, under the portal keys.
//! Successful login or registration is followed by exactly one profile
//! fetch; the profile's user fragment is written back to storage.

use tokio::sync::RwLock;
use tracing::{info, warn};
use vetclinic_core::models::auth::{AuthResponse, PortalLoginRequest, RegisterRequest, User};
use vetclinic_core::models::portal::PortalProfile;
use vetclinic_core::session::{PersistedSession, Route, Session, SessionDomain};

use super::{AuthOutcome, credential_failure};
use crate::error::{ApiError, ApiResult, GENERIC_MESSAGE};
use crate::http::ApiClient;

#[derive(Default)]
struct PortalState {
    session: Option<Session<User>>,
    profile: Option<PortalProfile>,
}

/// Customer session plus the cached profile aggregate.
pub struct PortalSession {
    client: ApiClient,
    state: RwLock<PortalState>,
}

impl PortalSession {
    /// `client` must be bound to `SessionDomain::Portal`.
    pub fn new(client: ApiClient) -> Self {
        debug_assert_eq!(client.domain(), SessionDomain::Portal);
        Self {
            client,
            state: RwLock::new(PortalState::default()),
        }
    }

    /// Restore a persisted session and refresh the profile.
    pub async fn init(&self) -> Option<PortalProfile> {
        match PersistedSession::load::<User>(self.client.storage(), SessionDomain::Portal) {
            Ok(Some(session)) => {
                self.state.write().await.session = Some(session);
            }
            Ok(None) => {
                // A token without a user can still be recovered from the profile.
                match PersistedSession::token(self.client.storage(), SessionDomain::Portal) {
                    Ok(Some(_)) => {}
                    Ok(None) => return None,
                    Err(e) => {
                        warn!(error = %e, "cannot read persisted portal session");
                        return None;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot read persisted portal session");
                return None;
            }
        }

        match self.refresh_profile().await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "portal session restore failed");
                None
            }
        }
    }

    /// Authenticate with customer credentials.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let request = PortalLoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self
            .client
            .post::<AuthResponse, _>("portal/auth/login", &request)
            .await;
        self.establish(result, "login").await
    }

    /// Create a customer account and sign in.
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        let result = self
            .client
            .post::<AuthResponse, _>("portal/auth/register", request)
            .await;
        self.establish(result, "register").await
    }

    async fn establish(&self, result: ApiResult<AuthResponse>, action: &str) -> AuthOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(action, error = %e, "portal authentication failed");
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
        if let Err(e) =
            PersistedSession::save(self.client.storage(), SessionDomain::Portal, &session)
        {
            warn!(error = %e, "cannot persist portal session");
            return AuthOutcome::Failed {
                message: ApiError::from(e).user_message(),
            };
        }
        info!(action, user_id = session.user.id, "portal session established");
        self.state.write().await.session = Some(session);

        match self.refresh_profile().await {
            Ok(_) => match self.user().await {
                Some(user) => AuthOutcome::Success(user),
                None => AuthOutcome::Failed {
                    message: GENERIC_MESSAGE.into(),
                },
            },
            Err(e) => AuthOutcome::Failed {
                message: e.user_message(),
            },
        }
    }

    /// Re-fetch the profile, e.g. after booking or cancelling.
    ///
    /// On failure both persisted entries are cleared and the error is
    /// returned; the caller decides where to navigate.
    pub async fn refresh_profile(&self) -> ApiResult<PortalProfile> {
        let profile = match self.client.get::<PortalProfile>("portal/profile").await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "portal profile fetch failed, clearing session");
                self.discard().await;
                return Err(e);
            }
        };

        let mut state = self.state.write().await;
        if let Some(user) = &profile.user {
            PersistedSession::save_user(self.client.storage(), SessionDomain::Portal, user)?;
            let token = match state.session.take() {
                Some(session) => Some(session.token),
                None => PersistedSession::token(self.client.storage(), SessionDomain::Portal)?,
            };
            state.session = token.map(|token| Session {
                token,
                user: user.clone(),
            });
        }
        if state.session.is_none() {
            drop(state);
            warn!("portal profile carried no user for a token-only session");
            self.discard().await;
            return Err(ApiError::Unauthenticated {
                domain: SessionDomain::Portal,
                message: None,
            });
        }
        state.profile = Some(profile.clone());
        Ok(profile)
    }

    /// End the session and return the portal login route.
    pub async fn logout(&self) -> ApiResult<Route> {
        PersistedSession::clear(self.client.storage(), SessionDomain::Portal)?;
        *self.state.write().await = PortalState::default();
        info!("portal logged out");
        Ok(SessionDomain::Portal.login_route())
    }

    /// Drop in-memory state after the client reported a 401.
    pub async fn expire(&self) {
        *self.state.write().await = PortalState::default();
    }

    pub async fn user(&self) -> Option<User> {
        self.state
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub async fn profile(&self) -> Option<PortalProfile> {
        self.state.read().await.profile.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    async fn discard(&self) {
        if let Err(e) = PersistedSession::clear(self.client.storage(), SessionDomain::Portal) {
            warn!(error = %e, "cannot clear portal session");
        }
        *self.state.write().await = PortalState::default();
    }
}
