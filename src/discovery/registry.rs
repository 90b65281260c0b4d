use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{BuildError, DiscoveryError, ServiceEndpoint, ServiceRegistry};
use crate::config::DiscoveryConfig;

/// Fixed lookup table, resolved to the first instance listed for a name
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    instances: HashMap<String, Vec<ServiceEndpoint>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, service_name: &str, endpoint: ServiceEndpoint) -> Self {
        self.instances
            .entry(service_name.to_string())
            .or_default()
            .push(endpoint);
        self
    }

    pub fn from_table(table: &HashMap<String, Vec<String>>) -> Self {
        let mut registry = Self::new();
        for (name, addrs) in table {
            for addr in addrs {
                match ServiceEndpoint::parse(addr) {
                    Some(endpoint) => registry = registry.with_instance(name, endpoint),
                    None => tracing::warn!("Skipping static instance '{}' for '{}': expected host:port", addr, name),
                }
            }
        }
        registry
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[async_trait]
impl ServiceRegistry for StaticRegistry {
    async fn resolve(&self, service_name: &str) -> Result<ServiceEndpoint, DiscoveryError> {
        self.instances
            .get(service_name)
            .and_then(|endpoints| endpoints.first())
            .cloned()
            .ok_or_else(|| DiscoveryError::unavailable(service_name, "no instance registered"))
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[derive(Debug, Deserialize)]
struct EurekaApplicationEnvelope {
    application: EurekaApplication,
}

#[derive(Debug, Deserialize)]
struct EurekaApplication {
    #[serde(default)]
    instance: Vec<EurekaInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EurekaInstance {
    host_name: String,
    status: String,
    port: EurekaPort,
}

#[derive(Debug, Deserialize)]
struct EurekaPort {
    #[serde(rename = "$")]
    value: u16,
}

/// Resolves names against a Eureka server's `GET /eureka/apps/{APP}` view
#[derive(Debug, Clone)]
pub struct EurekaRegistry {
    base: Url,
    http: reqwest::Client,
}

impl EurekaRegistry {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BuildError> {
        let base = Url::parse(base_url).map_err(|e| BuildError::InvalidRegistryUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(BuildError::InvalidRegistryUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, http })
    }

    fn application_url(&self, service_name: &str) -> Url {
        let app = service_name.to_uppercase();
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["eureka", "apps", app.as_str()]);
        }
        url
    }
}

#[async_trait]
impl ServiceRegistry for EurekaRegistry {
    async fn resolve(&self, service_name: &str) -> Result<ServiceEndpoint, DiscoveryError> {
        let url = self.application_url(service_name);
        tracing::debug!("Resolving '{}' via {}", service_name, url);

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DiscoveryError::unavailable(service_name, format!("registry unreachable: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(DiscoveryError::unavailable(service_name, "not registered"));
            }
            status if !status.is_success() => {
                return Err(DiscoveryError::unavailable(
                    service_name,
                    format!("registry answered {}", status),
                ));
            }
            _ => {}
        }

        let envelope: EurekaApplicationEnvelope = response
            .json()
            .await
            .map_err(|e| DiscoveryError::InvalidResponse(format!("registry payload from {}: {}", url, e)))?;

        envelope
            .application
            .instance
            .into_iter()
            .find(|instance| instance.status.eq_ignore_ascii_case("UP"))
            .map(|instance| ServiceEndpoint::new(instance.host_name, instance.port.value))
            .ok_or_else(|| DiscoveryError::unavailable(service_name, "no healthy instance"))
    }

    fn describe(&self) -> String {
        format!("eureka({})", self.base)
    }
}

/// Tries each registry in order, moving on only when a name is unknown
pub struct ChainedRegistry {
    registries: Vec<Arc<dyn ServiceRegistry>>,
}

impl ChainedRegistry {
    pub fn new(registries: Vec<Arc<dyn ServiceRegistry>>) -> Self {
        Self { registries }
    }
}

#[async_trait]
impl ServiceRegistry for ChainedRegistry {
    async fn resolve(&self, service_name: &str) -> Result<ServiceEndpoint, DiscoveryError> {
        let mut last = DiscoveryError::unavailable(service_name, "no registry configured");
        for registry in &self.registries {
            match registry.resolve(service_name).await {
                Ok(endpoint) => return Ok(endpoint),
                Err(err @ DiscoveryError::ServiceUnavailable { .. }) => last = err,
                Err(err) => return Err(err),
            }
        }
        Err(last)
    }

    fn describe(&self) -> String {
        self.registries
            .iter()
            .map(|r| r.describe())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Static entries first, then the remote registry when one is configured
pub fn registry_from_config(config: &DiscoveryConfig) -> Result<Arc<dyn ServiceRegistry>, BuildError> {
    let mut registries: Vec<Arc<dyn ServiceRegistry>> = Vec::new();

    let fixed = StaticRegistry::from_table(&config.static_instances);
    if !fixed.is_empty() {
        registries.push(Arc::new(fixed));
    }
    if let Some(url) = &config.registry_url {
        let timeout = Duration::from_millis(config.timeout_ms);
        registries.push(Arc::new(EurekaRegistry::new(url, timeout)?));
    }

    Ok(Arc::new(ChainedRegistry::new(registries)))
}
