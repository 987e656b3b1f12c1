//! Configuration structures
//!
//! OAuth and webhook credentials are optional at load time. Each request
//! validates the settings it needs and fails with [`BridgeError::Config`] when
//! they are missing, so a partially configured process can still serve the
//! endpoints that do not depend on them.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDR, DEFAULT_DB_POOL_SIZE, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::errors::{BridgeError, Result};

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub oauth: OAuthSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Provider OAuth 2.0 application credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
}

impl OAuthSettings {
    /// Client id, or a configuration error when unset.
    pub fn client_id(&self) -> Result<&str> {
        non_empty(self.client_id.as_deref()).ok_or_else(missing_oauth_config)
    }

    /// Client id and secret used for client-basic authentication.
    pub fn client_credentials(&self) -> Result<(&str, &str)> {
        let id = self.client_id()?;
        let secret = non_empty(self.client_secret.as_deref()).ok_or_else(missing_oauth_config)?;
        Ok((id, secret))
    }

    /// Configured production callback URL.
    pub fn callback_url(&self) -> Result<&str> {
        non_empty(self.callback_url.as_deref()).ok_or_else(missing_oauth_config)
    }
}

/// Inbound webhook authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub secret: Option<String>,
}

/// SQLite database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "castbridge.db".to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR.to_string() }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS }
    }
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_oauth_config() -> BridgeError {
    BridgeError::Config("Missing Twitter OAuth 2.0 configuration".to_string())
}
