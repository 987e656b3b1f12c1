//! Authorization start: `GET /api/auth` and `GET /api/auth/tokens`

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use castbridge_domain::constants::{CODE_VERIFIER_COOKIE, PKCE_SESSION_TTL_SECS};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::utils::cookies::session_cookie;
use crate::utils::headers::{no_cache_headers, request_context};
use crate::utils::logging::log_request_outcome;

const FALLBACK: &str = "Error generating authentication link";

/// JSON variant of the authorization start.
#[derive(Debug, Serialize)]
pub struct AuthorizationTokens {
    pub url: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

/// Redirect to the provider, with the verifier parked server-side and in a
/// short-lived cookie.
pub async fn begin(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let result = ctx.auth.begin_auth(&ctx.config.oauth, &request_context(&headers));
    log_request_outcome("auth::begin", started.elapsed(), result.as_ref().err());

    match result {
        Ok(request) => {
            let verifier =
                session_cookie(CODE_VERIFIER_COOKIE, request.code_verifier, PKCE_SESSION_TTL_SECS);

            (jar.add(verifier), no_cache_headers(), Redirect::temporary(&request.url))
                .into_response()
        }
        Err(err) => ApiError::text(err, FALLBACK).no_cache().into_response(),
    }
}

/// Authorization URL plus the raw PKCE pair, without a server-side session.
pub async fn tokens(State(ctx): State<Arc<AppContext>>) -> Response {
    let started = Instant::now();
    let result = ctx.auth.authorization_tokens(&ctx.config.oauth);
    log_request_outcome("auth::tokens", started.elapsed(), result.as_ref().err());

    match result {
        Ok(request) => (
            no_cache_headers(),
            Json(AuthorizationTokens {
                url: request.url,
                code_verifier: request.code_verifier,
                code_challenge: request.code_challenge,
            }),
        )
            .into_response(),
        Err(err) => ApiError::json(err, FALLBACK).no_cache().into_response(),
    }
}
