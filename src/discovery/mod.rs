//! Registry-based name resolution and the remote info client built on it.
//!
//! A call to a peer is always two explicit steps: resolve the logical service
//! name through a [`ServiceRegistry`], then issue `GET /api/info` against the
//! resolved endpoint. Neither step retries.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::info::ServiceInfo;

pub mod client;
pub mod registry;

pub use client::RemoteInfoClient;
pub use registry::{registry_from_config, ChainedRegistry, EurekaRegistry, StaticRegistry};

/// Concrete address of one live instance, owned by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServiceEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `host:port`
    pub fn parse(raw: &str) -> Option<Self> {
        let (host, port) = raw.trim().rsplit_once(':')?;
        if host.is_empty() {
            return None;
        }
        Some(Self::new(host, port.parse().ok()?))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Service '{service}' is unavailable: {reason}")]
    ServiceUnavailable { service: String, reason: String },
    #[error("Remote call failed: {0}")]
    RemoteCallFailed(String),
    #[error("Invalid response from peer: {0}")]
    InvalidResponse(String),
}

impl DiscoveryError {
    pub fn unavailable(service: &str, reason: impl Into<String>) -> Self {
        DiscoveryError::ServiceUnavailable {
            service: service.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while wiring a registry or client from configuration
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid registry URL '{url}': {reason}")]
    InvalidRegistryUrl { url: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Maps a logical service name to one reachable endpoint
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn resolve(&self, service_name: &str) -> Result<ServiceEndpoint, DiscoveryError>;

    /// Short label used in logs and in the discovery demo response
    fn describe(&self) -> String;
}

/// Fetches the info payload of a named peer service
#[async_trait]
pub trait InfoClient: Send + Sync {
    async fn fetch_info(&self, target_service: &str) -> Result<ServiceInfo, DiscoveryError>;

    fn describe(&self) -> String {
        "HTTP".to_string()
    }
}
