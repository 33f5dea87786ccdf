//! Environment-driven configuration for the server and the content client.

use std::{path::PathBuf, time::Duration};

use crate::content::defaults::DEFAULT_ADMIN_PASSWORD;

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

/// Settings for the REST backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Secret checked against the `password` of every save request.
    pub admin_password: String,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 3001),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Settings for the content store running next to the admin UI.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend. `None` runs on the local cache only.
    pub api_url: Option<String>,
    pub request_timeout_secs: u64,
    pub cache_dir: PathBuf,
    /// How long the "saved" acknowledgment stays up before returning to idle.
    pub saved_ack_millis: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("API_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            request_timeout_secs: env_or("API_TIMEOUT_SECS", 10),
            cache_dir: std::env::var("CONTENT_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".cache/content")),
            saved_ack_millis: env_or("SAVED_ACK_MS", 1000),
        }
    }
}

impl ClientConfig {
    pub fn saved_ack(&self) -> Duration {
        Duration::from_millis(self.saved_ack_millis)
    }
}
