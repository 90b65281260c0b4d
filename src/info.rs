use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;

/// Health flag carried in the info payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

/// Wire shape of `GET /api/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub port: u16,
    pub status: ServiceStatus,
    pub message: String,
}

/// Holds the service identity captured at startup.
///
/// The snapshot is never mutated, so a single provider can be shared across
/// every request without locking.
#[derive(Debug, Clone)]
pub struct InfoProvider {
    snapshot: ServiceInfo,
}

impl InfoProvider {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            snapshot: ServiceInfo {
                service: config.name.clone(),
                port: config.port,
                status: ServiceStatus::Up,
                message: config.message.clone(),
            },
        }
    }

    pub fn get_info(&self) -> ServiceInfo {
        self.snapshot.clone()
    }
}
