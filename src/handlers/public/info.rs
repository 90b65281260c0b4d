use axum::{extract::State, Json};

use crate::info::ServiceInfo;
use crate::state::AppState;

/// GET /api/info - static identity of this service
///
/// ```json
/// { "service": "ch05-securing-applications", "port": 8080, "status": "UP", "message": "..." }
/// ```
///
/// The body is the bare object (no success envelope) so peers can decode it
/// straight into `ServiceInfo`.
pub async fn info_get(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info.get_info())
}
