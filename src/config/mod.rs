//! Configuration module for the landing page backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Admin login email
    pub admin_email: Option<String>,
    /// Admin login password
    pub admin_password: Option<String>,
    /// Lifetime of an admin session
    pub session_ttl_hours: i64,
    /// Mark the session cookie `Secure` (requires HTTPS)
    pub secure_cookies: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("LANDING_DB_PATH")
            .unwrap_or_else(|_| "./data/landing.sqlite".to_string())
            .into();

        let bind_addr = env::var("LANDING_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid LANDING_BIND_ADDR format");

        let log_level = env::var("LANDING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_json = env_flag("LANDING_LOG_JSON");

        let admin_email = non_empty_var("LANDING_ADMIN_EMAIL");
        let admin_password = non_empty_var("LANDING_ADMIN_PASSWORD");

        let session_ttl_hours = env::var("LANDING_SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|hours: &i64| *hours > 0)
            .unwrap_or(24);

        let secure_cookies = env_flag("LANDING_SECURE_COOKIES");

        Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            admin_email,
            admin_password,
            session_ttl_hours,
            secure_cookies,
        }
    }

    /// Whether both admin credentials are present.
    pub fn has_admin_credentials(&self) -> bool {
        self.admin_email.is_some() && self.admin_password.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
