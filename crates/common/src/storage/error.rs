//! Storage error types

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    R2d2(#[from] r2d2::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Check if this error is transient (busy/locked database, pool timeout).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) | Self::R2d2(_) => true,
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            Self::Query(_) | Self::InvalidConfig(_) => false,
        }
    }
}
