mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use gated_info_api::discovery::{
    DiscoveryError, EurekaRegistry, InfoClient, ServiceEndpoint, ServiceRegistry, StaticRegistry,
};

fn registry_for(name: &str, addr: std::net::SocketAddr) -> StaticRegistry {
    StaticRegistry::new().with_instance(name, ServiceEndpoint::new("127.0.0.1", addr.port()))
}

#[tokio::test]
async fn fetch_info_returns_the_peers_own_snapshot() -> Result<()> {
    let (peer, addr) = common::spawn_peer("peer").await?;
    let client = common::client_for(Arc::new(registry_for("peer", addr)), Duration::from_secs(2));

    let info = client.fetch_info("peer").await?;
    assert_eq!(info, peer.info.get_info());
    assert_eq!(info.port, addr.port());
    Ok(())
}

#[tokio::test]
async fn unregistered_service_is_unavailable() -> Result<()> {
    let client = common::client_for(Arc::new(StaticRegistry::new()), Duration::from_secs(1));

    let err = client.fetch_info("unregistered-service").await.unwrap_err();
    assert!(
        matches!(err, DiscoveryError::ServiceUnavailable { ref service, .. } if service == "unregistered-service"),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn malformed_peer_body_is_an_invalid_response() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    common::serve(
        listener,
        Router::new().route("/api/info", get(|| async { Json(json!({ "service": "peer" })) })),
    );
    let client = common::client_for(Arc::new(registry_for("peer", addr)), Duration::from_secs(2));

    let err = client.fetch_info("peer").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidResponse(_)), "unexpected error: {err:?}");
    Ok(())
}

#[tokio::test]
async fn slow_peer_times_out_as_remote_call_failure() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    common::serve(
        listener,
        Router::new().route(
            "/api/info",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ),
    );
    let client = common::client_for(Arc::new(registry_for("peer", addr)), Duration::from_millis(200));

    let err = client.fetch_info("peer").await.unwrap_err();
    match err {
        DiscoveryError::RemoteCallFailed(msg) => assert!(msg.contains("timed out"), "message: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_a_remote_call_failure() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    drop(listener);
    let client = common::client_for(Arc::new(registry_for("peer", addr)), Duration::from_secs(1));

    let err = client.fetch_info("peer").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::RemoteCallFailed(_)), "unexpected error: {err:?}");
    Ok(())
}

#[tokio::test]
async fn gated_peer_redirect_is_not_followed() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    let mut config = common::test_config();
    config.security.extra_public_paths.clear();
    common::serve(listener, gated_info_api::app(common::test_state_from(config)));
    let client = common::client_for(Arc::new(registry_for("peer", addr)), Duration::from_secs(2));

    let err = client.fetch_info("peer").await.unwrap_err();
    match err {
        DiscoveryError::RemoteCallFailed(msg) => assert!(msg.contains("/login"), "message: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

/// Minimal stand-in for a Eureka server's application view
async fn spawn_fake_eureka(app_name: &'static str, peer_port: u16) -> Result<std::net::SocketAddr> {
    let (listener, addr) = common::bind().await?;
    let router = Router::new().route(
        "/eureka/apps/:app",
        get(move |Path(app): Path<String>| async move {
            if app != app_name {
                return Err(StatusCode::NOT_FOUND);
            }
            Ok(Json(json!({
                "application": {
                    "name": app_name,
                    "instance": [
                        { "hostName": "127.0.0.1", "status": "DOWN", "port": { "$": 1, "@enabled": "true" } },
                        { "hostName": "127.0.0.1", "status": "UP", "port": { "$": peer_port, "@enabled": "true" } }
                    ]
                }
            })))
        }),
    );
    common::serve(listener, router);
    Ok(addr)
}

#[tokio::test]
async fn eureka_registry_picks_the_first_healthy_instance() -> Result<()> {
    let eureka = spawn_fake_eureka("CH05-SECURING-APPLICATIONS", 9123).await?;
    let registry = EurekaRegistry::new(&format!("http://{}", eureka), Duration::from_secs(2))?;

    let endpoint = registry.resolve("ch05-securing-applications").await?;
    assert_eq!(endpoint, ServiceEndpoint::new("127.0.0.1", 9123));

    let err = registry.resolve("unregistered-service").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::ServiceUnavailable { .. }), "unexpected error: {err:?}");
    Ok(())
}

#[tokio::test]
async fn unreachable_registry_is_unavailable_not_success() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    drop(listener);
    let registry = EurekaRegistry::new(&format!("http://{}", addr), Duration::from_millis(500))?;

    let err = registry.resolve("peer").await.unwrap_err();
    match err {
        DiscoveryError::ServiceUnavailable { reason, .. } => {
            assert!(reason.contains("registry unreachable"), "reason: {reason}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn call_peer_endpoint_composes_the_peer_response() -> Result<()> {
    let (peer, peer_addr) = common::spawn_peer("ch05-securing-applications").await?;
    let eureka = spawn_fake_eureka("CH05-SECURING-APPLICATIONS", peer_addr.port()).await?;

    let mut config = common::test_config();
    config.service.name = "ch06-additional-security".to_string();
    config.discovery.registry_url = Some(format!("http://{}", eureka));
    let caller = gated_info_api::AppState::from_config(config)?;

    let token = common::session_token(&caller);
    let res = common::send(&caller, common::get_with_cookie("/api/discovery/call-peer", &token)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = common::body_json(res).await?;
    assert_eq!(body["caller"], "ch06-additional-security");
    assert_eq!(body["calledService"], "ch05-securing-applications");
    assert_eq!(body["peerResponse"], serde_json::to_value(peer.info.get_info())?);
    assert!(body["discoveryMethod"].as_str().unwrap_or_default().contains("eureka"));
    Ok(())
}

#[tokio::test]
async fn call_peer_endpoint_surfaces_unavailable_peer() -> Result<()> {
    let mut config = common::test_config();
    config.discovery.peer_service = "unregistered-service".to_string();
    let state = common::test_state_from(config);

    let token = common::session_token(&state);
    let res = common::send(&state, common::get_with_cookie("/api/discovery/call-peer", &token)).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = common::body_json(res).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}
