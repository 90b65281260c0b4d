#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use tower::ServiceExt;

use gated_info_api::auth::{issue_token, SESSION_COOKIE};
use gated_info_api::config::AppConfig;
use gated_info_api::discovery::{RemoteInfoClient, ServiceRegistry, StaticRegistry};
use gated_info_api::{app, AppState};

pub const TEST_USER: &str = "user";
pub const TEST_PASSWORD: &str = "password";

/// Development defaults with no remote registry, so nothing leaves loopback
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.discovery.registry_url = None;
    config.discovery.timeout_ms = 1000;
    config.security.jwt_secret = "integration-test-secret".to_string();
    config
}

pub fn client_for(registry: Arc<dyn ServiceRegistry>, timeout: Duration) -> RemoteInfoClient {
    RemoteInfoClient::new(registry, timeout).expect("http client")
}

pub fn state_with_registry(config: AppConfig, registry: StaticRegistry) -> AppState {
    let timeout = Duration::from_millis(config.discovery.timeout_ms);
    AppState::with_client(config, Arc::new(client_for(Arc::new(registry), timeout))).expect("state")
}

pub fn test_state() -> AppState {
    state_with_registry(test_config(), StaticRegistry::new())
}

pub fn session_token(state: &AppState) -> String {
    issue_token(&state.config.security, TEST_USER).expect("token")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
        .body(Body::empty())
        .expect("request")
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

/// Drives one request through a fresh router without opening a socket
pub async fn send(state: &AppState, request: Request<Body>) -> Result<Response<Body>> {
    Ok(app(state.clone()).oneshot(request).await?)
}

pub async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response<Body>) -> Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

/// Binds an ephemeral loopback port; the listener is handed to `serve`
pub async fn bind() -> Result<(tokio::net::TcpListener, SocketAddr)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind loopback listener")?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

pub fn serve(listener: tokio::net::TcpListener, router: Router) {
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
}

/// Starts a full peer service on loopback and returns its state and address.
/// The peer's configured port is its real port, so its info payload is what a
/// caller will see.
pub async fn spawn_peer(name: &str) -> Result<(AppState, SocketAddr)> {
    let (listener, addr) = bind().await?;
    let mut config = test_config();
    config.service.name = name.to_string();
    config.service.port = addr.port();
    config.service.message = format!("Hello from {}!", name);

    let state = test_state_from(config);
    serve(listener, app(state.clone()));
    Ok((state, addr))
}

pub fn test_state_from(config: AppConfig) -> AppState {
    state_with_registry(config, StaticRegistry::new())
}
