use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::{AppConfig, DiscoveryConfig};
use crate::discovery::{InfoClient, ServiceRegistry};
use crate::error::ApiError;

#[derive(Subcommand)]
pub enum DiscoveryCommands {
    #[command(about = "Resolve a service name to host:port through the configured registry")]
    Resolve {
        #[arg(help = "Logical service name")]
        service: String,
    },

    #[command(about = "Resolve a service and fetch its /api/info (defaults to PEER_SERVICE)")]
    Call {
        #[arg(help = "Logical service name")]
        service: Option<String>,
    },
}

pub async fn handle(cmd: DiscoveryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = super::client_from_env()?;

    match cmd {
        DiscoveryCommands::Resolve { service } => match client.resolve(&service).await {
            Ok(endpoint) => output_success(
                &output_format,
                &format!("{} -> {}", service, endpoint),
                Some(json!({
                    "service": service,
                    "host": endpoint.host,
                    "port": endpoint.port,
                    "registry": client.registry().describe(),
                })),
            ),
            Err(e) => fail(&output_format, e.into(), &service),
        },
        DiscoveryCommands::Call { service } => {
            let service = target_service(service, &AppConfig::from_env().discovery);
            match client.fetch_info(&service).await {
                Ok(info) => output_success(
                    &output_format,
                    &format!("{} answered via {}", service, client.describe()),
                    Some(serde_json::to_value(&info)?),
                ),
                Err(e) => fail(&output_format, e.into(), &service),
            }
        }
    }
}

/// Service named on the command line, else the configured `PEER_SERVICE`
pub fn target_service(service: Option<String>, discovery: &DiscoveryConfig) -> String {
    service.unwrap_or_else(|| discovery.peer_service.clone())
}

fn fail(output_format: &OutputFormat, err: ApiError, service: &str) -> anyhow::Result<()> {
    output_error(output_format, err.message(), Some(err.error_code()))?;
    anyhow::bail!("discovery of '{}' failed", service)
}
