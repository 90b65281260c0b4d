// handlers/public/login.rs - form login and logout

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::{issue_token, SESSION_COOKIE};
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::middleware::gate::LOGIN_PATH;
use crate::state::AppState;

pub const LOGIN_SUCCESS_PATH: &str = "/dashboard";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login - sign-in form, always reachable
///
/// `?error` and `?logout` select the banner shown above the form.
pub async fn login_page(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let banner = if params.contains_key("error") {
        "<p class=\"error\">Invalid username or password.</p>\n"
    } else if params.contains_key("logout") {
        "<p class=\"info\">You have been signed out.</p>\n"
    } else {
        ""
    };

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Sign in</title></head>\n<body>\n\
         <h1>Sign in</h1>\n{banner}\
         <form method=\"post\" action=\"/login\">\n\
         <label>Username <input type=\"text\" name=\"username\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Sign in</button>\n</form>\n\
         </body>\n</html>\n"
    ))
}

/// POST /login - verify credentials and open a cookie session
///
/// Success redirects to the dashboard with a fresh `SESSION` cookie; bad
/// credentials redirect back to `/login?error`.
pub async fn login_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if !state.users.verify(&form.username, &form.password) {
        tracing::warn!("Failed login attempt for user '{}'", form.username);
        return Ok(see_other(&format!("{}?error", LOGIN_PATH), None));
    }

    let security = &state.config.security;
    let token = issue_token(security, &form.username)?;
    tracing::info!("User '{}' signed in", form.username);

    let cookie = session_cookie(security, &token, security.session_ttl_minutes * 60);
    Ok(see_other(LOGIN_SUCCESS_PATH, Some(cookie)))
}

/// POST /logout - drop the session cookie
pub async fn logout_post(State(state): State<AppState>) -> Response {
    let cookie = session_cookie(&state.config.security, "", 0);
    see_other(&format!("{}?logout", LOGIN_PATH), Some(cookie))
}

fn session_cookie(security: &SecurityConfig, token: &str, max_age_secs: u64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if security.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn see_other(location: &str, cookie: Option<String>) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        headers.insert(header::SET_COOKIE, value);
    }
    response
}
