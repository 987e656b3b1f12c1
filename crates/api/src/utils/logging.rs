use std::time::Duration;

use castbridge_domain::BridgeError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,castbridge=debug";

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_ENV: &str = "CASTBRIDGE_LOG_FORMAT";

/// Install the global `tracing` subscriber.
///
/// # Errors
/// Fails if `RUST_LOG` is malformed or a subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) => EnvFilter::try_new(DEFAULT_LOG_FILTER)?,
    };

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    if json {
        builder.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}

/// Log the outcome of a request with structured fields.
///
/// `route` must be a stable identifier without request data.
#[inline]
pub fn log_request_outcome(route: &str, elapsed: Duration, error: Option<&BridgeError>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(route, duration_ms, "request_success"),
        Some(err) => warn!(
            route,
            duration_ms,
            status = err.status_code(),
            error_type = error_label(err),
            "request_failure"
        ),
    }
}

/// Convert a `BridgeError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &BridgeError) -> &'static str {
    match error {
        BridgeError::Config(_) => "config",
        BridgeError::InvalidRequest(_) => "invalid_request",
        BridgeError::Authentication(_) => "authentication",
        BridgeError::Authorization(_) => "authorization",
        BridgeError::NotFound(_) => "not_found",
        BridgeError::UpstreamAuth(_) => "upstream_auth",
        BridgeError::Publish(_) => "publish",
        BridgeError::Database(_) => "database",
        BridgeError::Network(_) => "network",
        BridgeError::Internal(_) => "internal",
    }
}
