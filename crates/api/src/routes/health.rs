//! Liveness probe: `GET /health`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::context::AppContext;

/// 200 when the database answers `SELECT 1`, otherwise 503.
pub async fn check(State(ctx): State<Arc<AppContext>>) -> Response {
    let db = Arc::clone(&ctx.db);
    let healthy = match tokio::task::spawn_blocking(move || db.health_check()).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(error = %err, "database health check failed");
            false
        }
        Err(err) => {
            warn!(error = %err, "database health check task failed");
            false
        }
    };

    if healthy {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" }))).into_response()
    }
}
