pub mod auth;
pub mod discovery;
pub mod info;
pub mod register;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::discovery::{registry_from_config, RemoteInfoClient, StaticRegistry};

/// Client wired from the environment, the same way the server wires it
pub(crate) fn client_from_env() -> anyhow::Result<RemoteInfoClient> {
    let config = AppConfig::from_env();
    let registry = registry_from_config(&config.discovery)?;
    Ok(RemoteInfoClient::new(registry, Duration::from_millis(config.discovery.timeout_ms))?)
}

/// Client for direct URL calls; it never consults a registry
pub(crate) fn direct_client() -> anyhow::Result<RemoteInfoClient> {
    let timeout = Duration::from_millis(AppConfig::from_env().discovery.timeout_ms);
    Ok(RemoteInfoClient::new(Arc::new(StaticRegistry::new()), timeout)?)
}
