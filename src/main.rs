use anyhow::Context;
use tracing_subscriber::EnvFilter;

use gated_info_api::{app, config, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up APP_NAME, REGISTRY_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting {} in {:?} mode", config.service.name, config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }
    if is_production!() && !config.security.cookie_secure {
        tracing::warn!("Session cookies are not marked Secure in production");
    }

    let bind_addr = format!("0.0.0.0:{}", config.service.port);
    let state = AppState::from_config(config).context("failed to build application state")?;
    if state.users.is_empty() {
        tracing::warn!("AUTH_USERS is empty; nobody can sign in");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
