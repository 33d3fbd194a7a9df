//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;

use cadet_shared::constants::{
    APP_NAME, DEFAULT_HTTP_PORT, MAX_SESSION_TTL_SECS, SESSION_TTL_SECS,
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Human-readable name for this school instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Cadet Flight School"`
    pub instance_name: String,

    /// Absolute session lifetime in seconds, at most one year.
    /// Env: `SESSION_TTL_SECS`
    /// Default: `86400` (24 hours)
    pub session_ttl_secs: i64,

    /// Mark the session cookie `Secure`.
    /// Env: `CADET_ENV` (`production` enables it)
    /// Default: `false`
    pub secure_cookies: bool,

    /// Populate the store with the demo school at startup.
    /// Env: `SEED_DEMO_DATA` (true/false)
    /// Default: `true`
    pub seed_demo_data: bool,

    /// Enforce the per-entity status transition tables. When off, any value
    /// of the status enum is accepted.
    /// Env: `STRICT_STATUS_TRANSITIONS` (true/false)
    /// Default: `false`
    pub strict_transitions: bool,

    /// Whether `/api/auth/register` accepts new accounts.
    /// Env: `REGISTRATION_OPEN` (true/false)
    /// Default: `true`
    pub registration_open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            instance_name: format!("{APP_NAME} Flight School"),
            session_ttl_secs: SESSION_TTL_SECS,
            secure_cookies: false,
            seed_demo_data: true,
            strict_transitions: false,
            registration_open: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(name) = lookup("INSTANCE_NAME") {
            if !name.trim().is_empty() {
                config.instance_name = name;
            }
        }

        if let Some(val) = lookup("SESSION_TTL_SECS") {
            match val.parse::<i64>() {
                Ok(secs) if (1..=MAX_SESSION_TTL_SECS).contains(&secs) => {
                    config.session_ttl_secs = secs
                }
                Ok(secs) if secs > MAX_SESSION_TTL_SECS => {
                    tracing::warn!(
                        value = secs,
                        max = MAX_SESSION_TTL_SECS,
                        "SESSION_TTL_SECS too large, capping"
                    );
                    config.session_ttl_secs = MAX_SESSION_TTL_SECS;
                }
                _ => tracing::warn!(value = %val, "Invalid SESSION_TTL_SECS, using default"),
            }
        }

        if let Some(env) = lookup("CADET_ENV") {
            config.secure_cookies = env.eq_ignore_ascii_case("production");
        }

        if let Some(val) = lookup("SEED_DEMO_DATA") {
            config.seed_demo_data = parse_flag(&val);
        }

        if let Some(val) = lookup("STRICT_STATUS_TRANSITIONS") {
            config.strict_transitions = parse_flag(&val);
        }

        if let Some(val) = lookup("REGISTRATION_OPEN") {
            config.registration_open = parse_flag(&val);
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

fn parse_flag(val: &str) -> bool {
    val != "false" && val != "0"
}
