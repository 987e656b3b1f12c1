//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for castbridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream auth error: {0}")]
    UpstreamAuth(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// HTTP status class the error surfaces as.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::Authentication(_) | Self::Authorization(_) => 401,
            Self::NotFound(_) => 404,
            Self::Config(_)
            | Self::UpstreamAuth(_)
            | Self::Publish(_)
            | Self::Database(_)
            | Self::Network(_)
            | Self::Internal(_) => 500,
        }
    }

    /// The bare message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::InvalidRequest(msg)
            | Self::Authentication(msg)
            | Self::Authorization(msg)
            | Self::NotFound(msg)
            | Self::UpstreamAuth(msg)
            | Self::Publish(msg)
            | Self::Database(msg)
            | Self::Network(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Whether the error is caused by the caller rather than the bridge.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Result type alias for castbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
