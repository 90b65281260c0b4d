use clap::Subcommand;
use serde_json::json;

use crate::auth::issue_token;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a session token signed with JWT_SECRET (use as Bearer or SESSION cookie)")]
    Token {
        #[arg(help = "Username placed in the token subject")]
        username: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { username } => {
            let security = AppConfig::from_env().security;
            let token = issue_token(&security, &username)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Issued session token for {}", username),
                    Some(json!({
                        "token": token,
                        "expires_in": security.session_ttl_minutes * 60,
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
