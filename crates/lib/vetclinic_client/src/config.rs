//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default API root when `VETCLINIC_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration shared by the admin and portal clients.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it (e.g. `.../api/clients`).
    pub api_base_url: Url,
    /// Directory holding persisted session storage.
    pub state_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config for `api_base_url` with default state dir and timeout.
    pub fn new(api_base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            state_dir: default_state_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                      | Default                       |
    /// |-------------------------------|-------------------------------|
    /// | `VETCLINIC_API_URL`           | `http://localhost:3000/api`   |
    /// | `VETCLINIC_STATE_DIR`         | `<data dir>/vetclinic`        |
    /// | `VETCLINIC_HTTP_TIMEOUT_SECS` | `30`                          |
    pub fn from_env() -> ApiResult<Self> {
        let api_url =
            std::env::var("VETCLINIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let state_dir = std::env::var("VETCLINIC_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_dir());
        let timeout_secs = std::env::var("VETCLINIC_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_base_url: parse_base_url(&api_url)?,
            state_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Replace the API root, e.g. from a command-line flag.
    pub fn set_api_url(&mut self, raw: &str) -> ApiResult<()> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(())
    }

    /// File backing the persisted session storage.
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("local_storage.json")
    }
}

/// Parse the API root, forcing a trailing slash so `Url::join` appends.
fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ApiError::Config(format!("invalid API URL {raw}: {e}")))
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vetclinic")
}
