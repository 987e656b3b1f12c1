//! # Castbridge API
//!
//! HTTP surface of the bridge:
//! - `GET /api/auth` and `GET /api/auth/tokens` start an OAuth 2.0 PKCE flow
//! - `GET /api/callback` completes it and links the Twitter account
//! - `POST /api/webhook` republishes signed cast webhooks
//! - `GET /health` reports database reachability

pub mod context;
pub mod error;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub use context::AppContext;
pub use error::ApiError;

/// Build the HTTP router over a shared [`AppContext`].
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/auth", get(routes::auth::begin))
        .route("/api/auth/tokens", get(routes::auth::tokens))
        .route("/api/callback", get(routes::callback::complete))
        .route("/api/webhook", post(routes::webhook::receive))
        .route("/health", get(routes::health::check))
        .with_state(ctx)
}
