use axum::{extract::State, response::Html};
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET / - public landing page
pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{name}</title></head>\n<body>\n\
         <h1>{name}</h1>\n<p>{message}</p>\n\
         <ul>\n<li><a href=\"/login\">Sign in</a></li>\n<li><a href=\"/dashboard\">Dashboard</a></li>\n</ul>\n\
         </body>\n</html>\n",
        name = state.config.service.name,
        message = state.config.service.message,
    ))
}

/// GET /health - liveness probe
pub async fn health() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
