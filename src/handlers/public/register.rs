use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::registration::{validate, RegistrationInput};

/// POST /register - validate a signup form
///
/// Expected Input:
/// ```json
/// { "username": "kim", "email": "kim@example.com", "password": "...", "confirmPassword": "..." }
/// ```
///
/// Every violated rule is returned at once under `field_errors`, in field
/// order. Accepted forms are acknowledged and dropped; nothing is stored.
pub async fn register_post(payload: Result<Json<RegistrationInput>, JsonRejection>) -> ApiResult<Value> {
    let Json(input) = payload?;

    if let Err(field_errors) = validate(&input) {
        tracing::debug!("Rejected registration with {} field error(s)", field_errors.len());
        return Err(ApiError::validation_error("Registration form is invalid", field_errors));
    }

    tracing::info!("Accepted registration for '{}'", input.username);
    Ok(ApiResponse::created(json!({
        "username": input.username,
        "email": input.email,
    })))
}
