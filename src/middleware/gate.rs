use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crate::auth::{verify_token, Claims, SESSION_COOKIE};
use crate::config::SecurityConfig;
use crate::state::AppState;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Authenticated user context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
}

/// Path policy: `/` and `/login` are always open, everything else needs a
/// session.
#[derive(Debug, Clone)]
pub struct AccessGate {
    extra_public: Vec<String>,
}

impl AccessGate {
    pub fn new(extra_public: Vec<String>) -> Self {
        Self { extra_public }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.extra_public_paths.clone())
    }

    pub fn is_public(&self, path: &str) -> bool {
        path == HOME_PATH || path == LOGIN_PATH || self.extra_public.iter().any(|p| p == path)
    }

    pub fn decide(&self, path: &str, state: AccessState) -> AccessDecision {
        if self.is_public(path) {
            return AccessDecision::Allow;
        }
        match state {
            AccessState::Authenticated => AccessDecision::Allow,
            AccessState::Anonymous => AccessDecision::RedirectToLogin,
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Runs ahead of every handler; anonymous requests to protected paths get a
/// `302` to `/login` instead of reaching the router.
pub async fn access_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = authenticate(&state.config.security, request.headers());
    let access = if auth_user.is_some() {
        AccessState::Authenticated
    } else {
        AccessState::Anonymous
    };

    match state.gate.decide(request.uri().path(), access) {
        AccessDecision::Allow => {
            if let Some(user) = auth_user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        AccessDecision::RedirectToLogin => {
            tracing::debug!("Redirecting anonymous request for {} to {}", request.uri().path(), LOGIN_PATH);
            redirect_to_login()
        }
    }
}

pub fn redirect_to_login() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response()
}

/// Resolves the caller from a Bearer token or the session cookie; any
/// invalid or expired token leaves the request anonymous.
///
/// A Bearer token that fails verification does not hide a valid cookie.
pub fn authenticate(security: &SecurityConfig, headers: &HeaderMap) -> Option<AuthUser> {
    [extract_bearer_token(headers), extract_session_cookie(headers)]
        .into_iter()
        .flatten()
        .find_map(|token| match verify_token(security, &token) {
            Ok(claims) => Some(AuthUser::from(claims)),
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                None
            }
        })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
