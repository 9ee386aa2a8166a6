//! Composition root shared by every front end.

use std::sync::Arc;

use tracing::{info, warn};
use vetclinic_core::models::portal::PortalProfile;
use vetclinic_core::session::{Route, SessionDomain};
use vetclinic_core::storage::{FileStorage, SessionStorage};

use crate::api::{AdminApi, PortalApi};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::session::{AdminSession, PortalSession};

/// Shared application state: one client, store and API surface per domain.
#[derive(Clone)]
pub struct AppContext {
    /// Client configuration.
    pub config: ClientConfig,
    /// Staff session store.
    pub admin: Arc<AdminSession>,
    /// Customer session store.
    pub portal: Arc<PortalSession>,
    /// Staff resources.
    pub admin_api: AdminApi,
    /// Customer resources.
    pub portal_api: PortalApi,
    storage: Arc<dyn SessionStorage>,
}

impl AppContext {
    /// Wire both domains over one storage backend.
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> ApiResult<Self> {
        let admin_client = ApiClient::new(&config, SessionDomain::Admin, storage.clone())?;
        let portal_client = ApiClient::new(&config, SessionDomain::Portal, storage.clone())?;
        Ok(Self {
            admin: Arc::new(AdminSession::new(admin_client.clone())),
            portal: Arc::new(PortalSession::new(portal_client.clone())),
            admin_api: AdminApi::new(admin_client),
            portal_api: PortalApi::new(portal_client),
            config,
            storage,
        })
    }

    /// Context persisting sessions to the configured state directory.
    pub fn open(config: ClientConfig) -> ApiResult<Self> {
        let storage = FileStorage::open(config.storage_path())?;
        info!(path = %storage.path().display(), "session storage opened");
        Self::new(config, Arc::new(storage))
    }

    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    /// Re-sync the cached portal profile after a booking or cancellation.
    ///
    /// Failures are logged; the store has already cleared itself.
    pub async fn portal_changed(&self) -> Option<PortalProfile> {
        match self.portal.refresh_profile().await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "portal profile refresh after change failed");
                None
            }
        }
    }

    /// Route an error escaping a view.
    ///
    /// `Unauthenticated` expires the matching in-memory store (storage was
    /// already cleared by the client) and yields that domain's login route.
    /// Anything else yields `None`.
    pub async fn handle_error(&self, err: &ApiError) -> Option<Route> {
        let ApiError::Unauthenticated { domain, .. } = err else {
            return None;
        };
        match domain {
            SessionDomain::Admin => self.admin.expire().await,
            SessionDomain::Portal => self.portal.expire().await,
        }
        Some(domain.login_route())
    }
}
