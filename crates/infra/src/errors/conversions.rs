//! Conversions from external infrastructure errors into domain errors.

use castbridge_common::storage::StorageError;
use castbridge_domain::BridgeError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

trait IntoBridgeError {
    fn into_bridge(self) -> BridgeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for SqlError {
    fn into_bridge(self) -> BridgeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => BridgeError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        BridgeError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        BridgeError::Database(format!("unique constraint violation: {message}"))
                    }
                    _ => BridgeError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => BridgeError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                BridgeError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                BridgeError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::IntegralValueOutOfRange(index, value) => {
                BridgeError::Database(format!("integer {value} out of range for column {index}"))
            }
            RE::InvalidPath(path) => BridgeError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => BridgeError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for StorageError {
    fn into_bridge(self) -> BridgeError {
        match self {
            StorageError::Rusqlite(err) => err.into_bridge(),
            StorageError::InvalidConfig(message) => {
                BridgeError::Config(format!("invalid database configuration: {message}"))
            }
            other => BridgeError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for HttpError {
    fn into_bridge(self) -> BridgeError {
        if self.is_timeout() {
            return BridgeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BridgeError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return BridgeError::Network(format!("failed to decode HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            return BridgeError::Network(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        BridgeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
