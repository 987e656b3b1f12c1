//! Provider redirect target: `GET /api/callback`

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use castbridge_core::CallbackParams;
use castbridge_domain::constants::{
    CODE_VERIFIER_COOKIE, IDENTITY_COOKIE, IDENTITY_COOKIE_MAX_AGE_SECS,
};
use serde::Deserialize;
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::utils::cookies::{expired_cookie, read_cookie, session_cookie};
use crate::utils::headers::{no_cache_headers, request_context};
use crate::utils::logging::log_request_outcome;

const FALLBACK: &str = "Error during authentication callback";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl From<CallbackQuery> for CallbackParams {
    fn from(query: CallbackQuery) -> Self {
        Self {
            code: query.code,
            state: query.state,
            error: query.error,
            error_description: query.error_description,
        }
    }
}

/// Complete the authorization and remember the linked account in a cookie.
///
/// The verifier cookie is cleared on every outcome.
pub async fn complete(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let cookie_verifier = read_cookie(&jar, CODE_VERIFIER_COOKIE);
    let jar = jar.add(expired_cookie(CODE_VERIFIER_COOKIE));

    let result = ctx
        .auth
        .complete_callback(
            &ctx.config.oauth,
            &request_context(&headers),
            query.into(),
            cookie_verifier.as_deref(),
        )
        .await;
    log_request_outcome("callback::complete", started.elapsed(), result.as_ref().err());

    match result {
        Ok(identity) => {
            info!(provider_user_id = %identity.provider_user_id, "account linked via callback");
            let jar = jar.add(session_cookie(
                IDENTITY_COOKIE,
                identity.provider_user_id,
                IDENTITY_COOKIE_MAX_AGE_SECS,
            ));

            (jar, no_cache_headers(), Redirect::temporary("/")).into_response()
        }
        Err(err) => (jar, ApiError::text(err, FALLBACK).no_cache()).into_response(),
    }
}
