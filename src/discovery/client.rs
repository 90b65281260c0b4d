use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;

use super::{BuildError, DiscoveryError, InfoClient, ServiceEndpoint, ServiceRegistry};
use crate::info::ServiceInfo;

pub const INFO_PATH: &str = "/api/info";

/// HTTP-backed [`InfoClient`] that resolves every target through a registry
/// before calling it.
#[derive(Clone)]
pub struct RemoteInfoClient {
    registry: Arc<dyn ServiceRegistry>,
    http: reqwest::Client,
    timeout: Duration,
}

impl RemoteInfoClient {
    pub fn new(registry: Arc<dyn ServiceRegistry>, timeout: Duration) -> Result<Self, BuildError> {
        // A gated peer answers with a login redirect; surface it rather than follow it
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            registry,
            http,
            timeout,
        })
    }

    pub fn registry(&self) -> &Arc<dyn ServiceRegistry> {
        &self.registry
    }

    pub async fn resolve(&self, target_service: &str) -> Result<ServiceEndpoint, DiscoveryError> {
        self.registry.resolve(target_service).await
    }

    /// Calls `GET {base_url}/api/info` directly, without a registry lookup
    pub async fn fetch_from(&self, base_url: &str) -> Result<ServiceInfo, DiscoveryError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), INFO_PATH);

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DiscoveryError::RemoteCallFailed(format!(
                        "GET {} timed out after {}ms",
                        url,
                        self.timeout.as_millis()
                    ))
                } else {
                    DiscoveryError::RemoteCallFailed(format!("GET {}: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|l| format!(" (location: {})", l))
                .unwrap_or_default();
            return Err(DiscoveryError::RemoteCallFailed(format!(
                "GET {} answered {}{}",
                url, status, location
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DiscoveryError::RemoteCallFailed(format!("reading body of {}: {}", url, e))
        })?;

        serde_json::from_slice::<ServiceInfo>(&body)
            .map_err(|e| DiscoveryError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl InfoClient for RemoteInfoClient {
    async fn fetch_info(&self, target_service: &str) -> Result<ServiceInfo, DiscoveryError> {
        let endpoint = self.resolve(target_service).await?;
        tracing::debug!("Resolved '{}' to {}", target_service, endpoint);

        let result = self.fetch_from(&endpoint.base_url()).await;
        if let Err(e) = &result {
            tracing::warn!("Info lookup of '{}' at {} failed: {}", target_service, endpoint, e);
        }
        result
    }

    fn describe(&self) -> String {
        format!("registry [{}] + HTTP", self.registry.describe())
    }
}
