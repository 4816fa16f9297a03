//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, BackendClient};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Immutable after startup. Per-administrator state lives in the
/// request-scoped session, never here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: BackendClient,
}

impl AppState {
    /// Build the state and the anonymous backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = BackendClient::new(&config.api_base_url)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Panel configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Backend client without credentials.
    #[must_use]
    pub fn api(&self) -> &BackendClient {
        &self.inner.api
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish()
    }
}
