//! Cast webhook receiver: `POST /api/webhook`

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use castbridge_domain::constants::WEBHOOK_SIGNATURE_HEADER;
use castbridge_domain::{PostConfirmation, PublishResult, SkippedMedia};
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::utils::logging::log_request_outcome;

const FALLBACK: &str = "Error handling webhook";

/// Success body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
    pub tweet: TweetEnvelope,
    pub media_ids: Vec<String>,
    pub skipped_media: Vec<SkippedMedia>,
}

/// Post confirmation in the platform's `{data: {...}}` shape.
#[derive(Debug, Serialize)]
pub struct TweetEnvelope {
    pub data: PostConfirmation,
}

impl From<PublishResult> for WebhookResponse {
    fn from(result: PublishResult) -> Self {
        Self {
            message: "Tweet posted successfully",
            tweet: TweetEnvelope { data: result.post },
            media_ids: result.media_ids,
            skipped_media: result.skipped,
        }
    }
}

/// Verify, parse and republish one delivery.
pub async fn receive(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let delivery_id = Uuid::now_v7();
    let signature = headers.get(WEBHOOK_SIGNATURE_HEADER).and_then(|value| value.to_str().ok());

    let span = tracing::info_span!("webhook", %delivery_id, size = body.len());
    let result = ctx.bridge.handle_webhook(&ctx.config, &body, signature).instrument(span).await;
    log_request_outcome("webhook::receive", started.elapsed(), result.as_ref().err());

    match result {
        Ok(published) => {
            info!(
                %delivery_id,
                post_id = %published.post.id,
                media = published.media_ids.len(),
                skipped = published.skipped.len(),
                "cast republished"
            );
            Json(WebhookResponse::from(published)).into_response()
        }
        Err(err) => ApiError::text(err, FALLBACK).into_response(),
    }
}
