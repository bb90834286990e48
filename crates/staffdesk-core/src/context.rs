//! Wiring of store, auth state and client for a front-end.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::ApiClient;
use crate::auth::{AuthManager, AuthState, CredentialStore};
use crate::config::Config;

/// Everything a front-end needs: the auth state machine and a client
/// whose 401s are routed to it.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<AuthManager>,
    pub api: ApiClient,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, storage = ?config.storage, "Opening credential store");
        let store = Arc::new(CredentialStore::open(config.storage, data_dir));
        Self::with_store(config.api_base_url(), config, store)
    }

    pub fn with_store(base_url: String, config: &Config, store: Arc<CredentialStore>) -> Result<Self> {
        let auth = Arc::new(AuthManager::new(store.clone()));
        let api = ApiClient::builder(base_url, store)
            .timeout(config.request_timeout())
            .on_unauthorized(auth.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { auth, api })
    }

    /// Read the persisted session and leave `Loading`.
    pub fn bootstrap(&self) -> AuthState {
        self.auth.bootstrap()
    }
}
