pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "infoctl")]
#[command(about = "infoctl - operator tool for the gated info service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Fetch /api/info from a service by URL")]
    Info {
        #[arg(help = "Base URL, e.g. http://localhost:8080")]
        url: String,
    },

    #[command(about = "Registry lookups and peer calls")]
    Discovery {
        #[command(subcommand)]
        cmd: commands::discovery::DiscoveryCommands,
    },

    #[command(about = "Session token tooling")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Signup form checks")]
    Register {
        #[command(subcommand)]
        cmd: commands::register::RegisterCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Info { url } => commands::info::handle(url, output_format).await,
        Commands::Discovery { cmd } => commands::discovery::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Register { cmd } => commands::register::handle(cmd, output_format).await,
    }
}
