use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthError, UserStore};
use crate::config::AppConfig;
use crate::discovery::{registry_from_config, BuildError, InfoClient, RemoteInfoClient};
use crate::info::InfoProvider;
use crate::middleware::AccessGate;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("discovery setup failed: {0}")]
    Discovery(#[from] BuildError),
    #[error("credential setup failed: {0}")]
    Credentials(#[from] AuthError),
}

/// Everything a handler may read; built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub info: Arc<InfoProvider>,
    pub gate: Arc<AccessGate>,
    pub users: Arc<UserStore>,
    pub client: Arc<dyn InfoClient>,
}

impl AppState {
    /// Wires the registry-backed remote client described by `config.discovery`
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let registry = registry_from_config(&config.discovery)?;
        let timeout = Duration::from_millis(config.discovery.timeout_ms);
        let client = RemoteInfoClient::new(registry, timeout)?;
        Self::with_client(config, Arc::new(client))
    }

    pub fn with_client(config: AppConfig, client: Arc<dyn InfoClient>) -> Result<Self, StateError> {
        Ok(Self {
            info: Arc::new(InfoProvider::from_config(&config.service)),
            gate: Arc::new(AccessGate::from_config(&config.security)),
            users: Arc::new(UserStore::from_config(&config.security)?),
            client,
            config: Arc::new(config),
        })
    }
}
