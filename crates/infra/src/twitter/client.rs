//! Twitter API client
//!
//! Implements [`ProviderClient`] over the OAuth 2.0 token endpoint, the v2
//! `users/me` and `tweets` endpoints, and the v1.1 simple media upload.

use async_trait::async_trait;
use castbridge_common::auth::TokenResponse;
use castbridge_core::{ClientCredentials, CodeExchange, ProviderClient};
use castbridge_domain::constants::{
    TWITTER_API_BASE_URL, TWITTER_UPLOAD_BASE_URL, TWITTER_USER_FIELDS,
};
use castbridge_domain::{BridgeError, MediaPayload, PostConfirmation, ProviderProfile, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::types::{
    media_category, ApiErrorBody, CreateTweetRequest, DataEnvelope, MediaUploadResponse,
    TweetMedia,
};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Base URLs of the two API hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitterEndpoints {
    pub api_base: String,
    pub upload_base: String,
}

impl Default for TwitterEndpoints {
    fn default() -> Self {
        Self::new(TWITTER_API_BASE_URL, TWITTER_UPLOAD_BASE_URL)
    }
}

impl TwitterEndpoints {
    pub fn new(api_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn token(&self) -> String {
        format!("{}/2/oauth2/token", self.api_base)
    }

    fn users_me(&self) -> String {
        format!("{}/2/users/me", self.api_base)
    }

    fn tweets(&self) -> String {
        format!("{}/2/tweets", self.api_base)
    }

    fn media_upload(&self) -> String {
        format!("{}/1.1/media/upload.json", self.upload_base)
    }
}

/// Twitter implementation of [`ProviderClient`]
pub struct TwitterClient {
    http: HttpClient,
    endpoints: TwitterEndpoints,
}

impl TwitterClient {
    /// Client against the production hosts.
    pub fn new(http: HttpClient) -> Self {
        Self::with_endpoints(http, TwitterEndpoints::default())
    }

    /// Client against custom hosts (tests, proxies).
    pub fn with_endpoints(http: HttpClient, endpoints: TwitterEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &TwitterEndpoints {
        &self.endpoints
    }

    async fn token_request(
        &self,
        credentials: &ClientCredentials,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        let request = self
            .http
            .request(Method::POST, self.endpoints.token())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(form);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            warn!(%status, error = %detail, "token endpoint rejected request");
            return Err(BridgeError::UpstreamAuth(format!(
                "token endpoint returned {}: {detail}",
                status.as_u16()
            )));
        }

        decode(response).await
    }
}

#[async_trait]
impl ProviderClient for TwitterClient {
    #[instrument(skip_all)]
    async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        exchange: &CodeExchange,
    ) -> Result<TokenResponse> {
        debug!(redirect_uri = %exchange.redirect_uri, "exchanging authorization code");
        self.token_request(
            credentials,
            &[
                ("code", exchange.code.as_str()),
                ("grant_type", "authorization_code"),
                ("client_id", credentials.client_id.as_str()),
                ("redirect_uri", exchange.redirect_uri.as_str()),
                ("code_verifier", exchange.code_verifier.as_str()),
            ],
        )
        .await
    }

    #[instrument(skip_all)]
    async fn refresh_token(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        debug!("refreshing access token");
        self.token_request(
            credentials,
            &[
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
                ("client_id", credentials.client_id.as_str()),
            ],
        )
        .await
    }

    #[instrument(skip_all)]
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile> {
        let request = self
            .http
            .request(Method::GET, self.endpoints.users_me())
            .bearer_auth(access_token)
            .query(&[("user.fields", TWITTER_USER_FIELDS)]);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            warn!(%status, error = %detail, "profile lookup failed");
            return Err(BridgeError::UpstreamAuth(format!(
                "profile lookup returned {}: {detail}",
                status.as_u16()
            )));
        }

        let envelope: DataEnvelope<ProviderProfile> = decode(response).await?;
        debug!(twitter_user_id = %envelope.data.id, "fetched profile");
        Ok(envelope.data)
    }

    #[instrument(skip_all, fields(size = media.bytes.len(), content_type = ?media.content_type))]
    async fn upload_media(&self, access_token: &str, media: MediaPayload) -> Result<String> {
        let category = media_category(media.content_type.as_deref());
        let mut part = Part::bytes(media.bytes).file_name("media");
        if let Some(content_type) = media.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|e| {
                BridgeError::InvalidRequest(format!("invalid media content type {content_type}: {e}"))
            })?;
        }
        let form = Form::new().text("media_category", category).part("media", part);

        let request = self
            .http
            .request(Method::POST, self.endpoints.media_upload())
            .bearer_auth(access_token)
            .multipart(form);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            warn!(%status, error = %detail, "media upload failed");
            return Err(BridgeError::Network(format!(
                "media upload returned {}: {detail}",
                status.as_u16()
            )));
        }

        let uploaded: MediaUploadResponse = decode(response).await?;
        debug!(media_id = %uploaded.media_id_string, category, "media uploaded");
        Ok(uploaded.media_id_string)
    }

    #[instrument(skip_all, fields(media_count = media_ids.len()))]
    async fn create_post(
        &self,
        access_token: &str,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostConfirmation> {
        let body = CreateTweetRequest {
            text,
            media: (!media_ids.is_empty()).then_some(TweetMedia { media_ids }),
        };

        let request = self
            .http
            .request(Method::POST, self.endpoints.tweets())
            .bearer_auth(access_token)
            .json(&body);

        let response = self.http.send(request).await.map_err(|e| {
            BridgeError::Publish(format!("failed to reach post endpoint: {}", e.message()))
        })?;
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            warn!(%status, error = %detail, "post rejected");
            return Err(BridgeError::Publish(format!(
                "post endpoint returned {}: {detail}",
                status.as_u16()
            )));
        }

        let envelope: DataEnvelope<PostConfirmation> = decode(response).await.map_err(|e| {
            BridgeError::Publish(format!("unreadable post confirmation: {}", e.message()))
        })?;
        info!(post_id = %envelope.data.id, "post created");
        Ok(envelope.data)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| BridgeError::from(InfraError::from(e)))
}

/// Best description of a failed response: the parsed error body if it has
/// one, else the raw text.
async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.summary())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string())
}
