// @zen-component: HTTP-ApiClient
//
//! Per-domain HTTP client.
//!
//! Two instances exist, one per session domain. Each reads its own bearer
//! token from session storage on every request and, on a 401, clears that
//! domain's persisted session before reporting `ApiError::Unauthenticated`.
//! Navigation is left to the caller.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;
use vetclinic_core::session::{PersistedSession, SessionDomain};
use vetclinic_core::storage::SessionStorage;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, message_from_body};

/// HTTP client bound to one session domain.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    domain: SessionDomain,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        domain: SessionDomain,
        storage: Arc<dyn SessionStorage>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            domain,
            storage,
        })
    }

    pub fn domain(&self) -> SessionDomain {
        self.domain
    }

    /// Session storage this client reads its token from.
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid path {path}: {e}")))
    }

    /// Build a request with the domain's bearer token attached.
    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!(domain = %self.domain, %method, %url, "api request");
        let mut builder = self.http.request(method, url);
        if let Some(token) = PersistedSession::token(self.storage(), self.domain)? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send and classify the response.
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(domain = %self.domain, url = %response.url(), "session rejected, clearing");
            if let Err(e) = PersistedSession::clear(self.storage(), self.domain) {
                warn!(domain = %self.domain, error = %e, "cannot clear rejected session");
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthenticated {
                domain: self.domain,
                message: message_from_body(&body),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            debug!(domain = %self.domain, %status, error = %err, "api request failed");
            return Err(err);
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::decode(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    /// `DELETE`; any response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Raw body download (e.g. invoice PDFs).
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use vetclinic_core::storage::MemoryStorage;

    use super::*;

    fn client(domain: SessionDomain) -> ApiClient {
        let config = ClientConfig::new("http://clinic.test/api").unwrap();
        ApiClient::new(&config, domain, Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn paths_join_under_api_root() {
        let client = client(SessionDomain::Admin);
        assert_eq!(
            client.url("/appointments/availability").unwrap().as_str(),
            "http://clinic.test/api/appointments/availability"
        );
        assert_eq!(
            client.url("portal/profile").unwrap().as_str(),
            "http://clinic.test/api/portal/profile"
        );
    }

    #[test]
    fn bearer_token_comes_from_own_domain() {
        let client = client(SessionDomain::Portal);
        client.storage().set("token", "staff-token").unwrap();
        client.storage().set("portal_token", "portal-token").unwrap();

        let request = client
            .request(Method::GET, "portal/profile")
            .unwrap()
            .build()
            .unwrap();
        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer portal-token");
    }

    #[test]
    fn no_token_means_no_header() {
        let client = client(SessionDomain::Admin);
        let request = client
            .request(Method::GET, "clients")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
