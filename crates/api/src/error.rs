//! HTTP rendering of [`BridgeError`]

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use castbridge_domain::BridgeError;
use serde_json::json;
use tracing::{error, warn};

use crate::utils::headers::no_cache_headers;
use crate::utils::logging::error_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Text,
    Json,
}

/// Error response for a route.
///
/// Client errors (4xx) and configuration errors carry their own message.
/// Every other server error is answered with the route's generic `fallback`
/// and the detail only goes to the log.
#[derive(Debug)]
pub struct ApiError {
    error: BridgeError,
    fallback: &'static str,
    format: BodyFormat,
    headers: HeaderMap,
}

impl ApiError {
    /// Plain-text body.
    pub fn text(error: BridgeError, fallback: &'static str) -> Self {
        Self { error, fallback, format: BodyFormat::Text, headers: HeaderMap::new() }
    }

    /// `{"error": message}` body.
    pub fn json(error: BridgeError, fallback: &'static str) -> Self {
        Self { error, fallback, format: BodyFormat::Json, headers: HeaderMap::new() }
    }

    /// Add the no-cache header set.
    #[must_use]
    pub fn no_cache(mut self) -> Self {
        self.headers.extend(no_cache_headers());
        self
    }

    pub fn error(&self) -> &BridgeError {
        &self.error
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Message shown to the caller.
    pub fn public_message(&self) -> &str {
        if self.error.is_client_error() || matches!(self.error, BridgeError::Config(_)) {
            self.error.message()
        } else {
            self.fallback
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let label = error_label(&self.error);
        if status.is_server_error() {
            error!(status = status.as_u16(), error_type = label, error = %self.error, "request failed");
        } else {
            warn!(status = status.as_u16(), error_type = label, error = %self.error, "request rejected");
        }

        let message = self.public_message().to_string();
        let body = match self.format {
            BodyFormat::Text => message.into_response(),
            BodyFormat::Json => Json(json!({ "error": message })).into_response(),
        };

        (status, self.headers, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn client_errors_expose_message() {
        let err = ApiError::text(
            BridgeError::NotFound("No linked Twitter account for this Farcaster user".into()),
            "Error handling webhook",
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "No linked Twitter account for this Farcaster user");
    }

    #[test]
    fn config_errors_expose_message() {
        let err = ApiError::text(
            BridgeError::Config("Missing Twitter OAuth 2.0 configuration".into()),
            "Error generating authentication link",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Missing Twitter OAuth 2.0 configuration");
    }

    #[test]
    fn server_errors_use_fallback() {
        let err = ApiError::text(
            BridgeError::Publish("post endpoint returned 403: duplicate".into()),
            "Error handling webhook",
        );
        assert_eq!(err.public_message(), "Error handling webhook");
    }

    #[tokio::test]
    async fn json_body_and_headers() {
        let response = ApiError::json(
            BridgeError::Config("Missing Twitter OAuth 2.0 configuration".into()),
            "Error generating authentication link",
        )
        .no_cache()
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["pragma"], "no-cache");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"error": "Missing Twitter OAuth 2.0 configuration"}));
    }
}
