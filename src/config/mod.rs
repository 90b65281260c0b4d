use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub service: ServiceConfig,
    pub discovery: DiscoveryConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Identity reported by `GET /api/info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Base URL of a Eureka-style registry, e.g. `http://localhost:8761`
    pub registry_url: Option<String>,
    /// Fixed `name -> [host:port]` table consulted before the registry
    pub static_instances: HashMap<String, Vec<String>>,
    /// Logical name of the peer called by `/api/discovery/call-peer`
    pub peer_service: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub session_ttl_minutes: u64,
    pub cookie_secure: bool,
    /// `username -> password` pairs accepted by the login form
    pub users: Vec<(String, String)>,
    /// Paths reachable without a session in addition to `/` and `/login`
    pub extra_public_paths: Vec<String>,
}

pub const DEFAULT_SERVICE_NAME: &str = "ch05-securing-applications";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Service identity
        let name_overridden = if let Ok(v) = env::var("APP_NAME") {
            self.service.name = v;
            true
        } else {
            false
        };
        if let Some(port) = env::var("APP_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.service.port = port;
        }
        if let Ok(v) = env::var("APP_MESSAGE") {
            self.service.message = v;
        } else if name_overridden {
            self.service.message = default_message(&self.service.name);
        }

        // Discovery overrides
        if let Ok(v) = env::var("REGISTRY_URL") {
            let v = v.trim().to_string();
            self.discovery.registry_url = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("REGISTRY_STATIC") {
            self.discovery.static_instances = parse_static_instances(&v);
        }
        if let Ok(v) = env::var("PEER_SERVICE") {
            self.discovery.peer_service = v;
        }
        if let Ok(v) = env::var("DISCOVERY_TIMEOUT_MS") {
            self.discovery.timeout_ms = v.parse().unwrap_or(self.discovery.timeout_ms);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_MINUTES") {
            self.security.session_ttl_minutes = v.parse().unwrap_or(self.security.session_ttl_minutes);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("AUTH_USERS") {
            self.security.users = parse_users(&v);
        }
        if let Ok(v) = env::var("GATE_PUBLIC_PATHS") {
            self.security.extra_public_paths = split_list(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            service: ServiceConfig {
                name: DEFAULT_SERVICE_NAME.to_string(),
                port: 8080,
                message: default_message(DEFAULT_SERVICE_NAME),
            },
            discovery: DiscoveryConfig {
                registry_url: Some("http://localhost:8761".to_string()),
                static_instances: HashMap::new(),
                peer_service: DEFAULT_SERVICE_NAME.to_string(),
                timeout_ms: 3000,
            },
            security: SecurityConfig {
                jwt_secret: "dev-only-session-secret".to_string(),
                session_ttl_minutes: 60 * 8,
                cookie_secure: false,
                users: vec![("user".to_string(), "password".to_string())],
                extra_public_paths: default_public_paths(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.discovery.registry_url = None;
        config.security.jwt_secret = String::new();
        config.security.session_ttl_minutes = 60;
        config.security.cookie_secure = true;
        config.security.users = Vec::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::staging();
        config.environment = Environment::Production;
        config.discovery.timeout_ms = 2000;
        config.security.session_ttl_minutes = 30;
        config
    }
}

/// Greeting follows the configured name so peers can tell each other apart
fn default_message(name: &str) -> String {
    format!("Hello from {}!", name)
}

fn default_public_paths() -> Vec<String> {
    vec![
        "/api/info".to_string(),
        "/register".to_string(),
        "/health".to_string(),
    ]
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses `name=host:port,name=host:port` into a lookup table; repeated names
/// accumulate instances in declaration order.
pub fn parse_static_instances(raw: &str) -> HashMap<String, Vec<String>> {
    let mut table: HashMap<String, Vec<String>> = HashMap::new();
    for entry in split_list(raw) {
        match entry.split_once('=') {
            Some((name, addr)) if !name.trim().is_empty() && !addr.trim().is_empty() => {
                table
                    .entry(name.trim().to_string())
                    .or_default()
                    .push(addr.trim().to_string());
            }
            _ => tracing::warn!("Ignoring malformed REGISTRY_STATIC entry '{}'", entry),
        }
    }
    table
}

/// Parses `user:password,user:password`
pub fn parse_users(raw: &str) -> Vec<(String, String)> {
    split_list(raw)
        .into_iter()
        .filter_map(|entry| {
            entry
                .split_once(':')
                .map(|(user, pass)| (user.to_string(), pass.to_string()))
        })
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
