use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::registration::{validate, RegistrationInput};

#[derive(Subcommand)]
pub enum RegisterCommands {
    #[command(about = "Run the signup form rules locally and list every violation")]
    Validate {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
    },
}

pub async fn handle(cmd: RegisterCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RegisterCommands::Validate {
            username,
            email,
            password,
            confirm_password,
        } => {
            let input = RegistrationInput {
                username,
                email,
                password,
                confirm_password,
            };

            match validate(&input) {
                Ok(()) => output_success(&output_format, "Registration form is valid", None),
                Err(field_errors) => {
                    match output_format {
                        OutputFormat::Json => {
                            println!(
                                "{}",
                                serde_json::to_string_pretty(&json!({
                                    "success": false,
                                    "error": "Registration form is invalid",
                                    "field_errors": field_errors,
                                }))?
                            );
                        }
                        OutputFormat::Text => {
                            output_error(&output_format, "Registration form is invalid", None)?;
                            for err in &field_errors {
                                eprintln!("  {}: {}", err.field, err.message);
                            }
                        }
                    }
                    anyhow::bail!("{} field error(s)", field_errors.len())
                }
            }
        }
    }
}
