use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::access_gate_middleware;
use crate::state::AppState;

/// Full router. The access gate wraps every route, including the 404
/// fallback, so anonymous requests to unknown paths are redirected as well.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        // Global middleware
        .layer(from_fn_with_state(state.clone(), access_gate_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::home))
        .route("/health", get(public::health))
        .route("/login", get(public::login_page).post(public::login_post))
        .route("/logout", post(public::logout_post))
        .route("/register", post(public::register_post))
        .route("/api/info", get(public::info_get))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(protected::dashboard))
        .route("/api/discovery/call-peer", get(protected::call_peer))
}
