use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Name of the cookie carrying the browser session token
pub const SESSION_COOKIE: &str = "SESSION";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: String, ttl_minutes: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::minutes(ttl_minutes as i64)).timestamp();

        Self {
            sub: user,
            sid: Uuid::new_v4(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Session secret not configured")]
    MissingSecret,
    #[error("Invalid session token: {0}")]
    InvalidToken(String),
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

pub fn issue_token(security: &SecurityConfig, user: &str) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let claims = Claims::new(user.to_string(), security.session_ttl_minutes);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_token(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// In-memory credential table for the login form.
///
/// Passwords from `AUTH_USERS` are hashed with Argon2id at startup and only
/// the PHC strings are kept.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    hashes: HashMap<String, String>,
}

impl UserStore {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        let mut hashes = HashMap::with_capacity(security.users.len());
        for (user, password) in &security.users {
            hashes.insert(user.clone(), hash_password(password)?);
        }
        Ok(Self { hashes })
    }

    pub fn verify(&self, user: &str, password: &str) -> bool {
        let Some(stored) = self.hashes.get(user) else {
            return false;
        };

        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored password hash for '{}' is unreadable: {}", user, e);
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Hashes a password into a salted Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trip_keeps_subject() {
        let security = AppConfig::development().security;
        let token = issue_token(&security, "alice").unwrap();
        let claims = verify_token(&security, &token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();
        let token = issue_token(&other, "alice").unwrap();
        assert!(matches!(verify_token(&security, &token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        assert!(matches!(issue_token(&security, "alice"), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn user_store_checks_password() {
        let store = UserStore::from_config(&AppConfig::development().security).unwrap();
        assert!(!store.is_empty());
        assert!(store.verify("user", "password"));
        assert!(!store.verify("user", "wrong"));
        assert!(!store.verify("nobody", "password"));
    }

    #[test]
    fn user_store_keeps_salted_argon2_hashes_only() {
        let mut security = AppConfig::development().security;
        security.users = vec![("a".to_string(), "same".to_string()), ("b".to_string(), "same".to_string())];
        let store = UserStore::from_config(&security).unwrap();

        let a = &store.hashes["a"];
        let b = &store.hashes["b"];
        assert!(a.starts_with("$argon2id$"), "hash: {a}");
        assert!(!a.contains("same"));
        assert_ne!(a, b, "equal passwords must not share a hash");
        assert!(store.verify("a", "same"));
        assert!(store.verify("b", "same"));
    }

    #[test]
    fn empty_user_table_is_reported() {
        let mut security = AppConfig::development().security;
        security.users.clear();
        let store = UserStore::from_config(&security).unwrap();
        assert!(store.is_empty());
        assert!(!store.verify("user", "password"));
    }
}
