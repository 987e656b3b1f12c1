//! Port interfaces for the publishing platform
//!
//! Implementations must bound every call with a finite timeout and report an
//! expired timeout as an error.

use async_trait::async_trait;
use castbridge_common::auth::TokenResponse;
use castbridge_domain::{MediaPayload, OAuthSettings, PostConfirmation, ProviderProfile, Result};

/// Client id and secret for client-basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// Pull both halves from the OAuth settings.
    pub fn from_settings(settings: &OAuthSettings) -> Result<Self> {
        let (client_id, client_secret) = settings.client_credentials()?;
        Ok(Self { client_id: client_id.to_string(), client_secret: client_secret.to_string() })
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Authorization-code grant parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExchange {
    pub code: String,
    pub code_verifier: String,
    pub redirect_uri: String,
}

/// OAuth 2.0 and publishing endpoints of the provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Exchange an authorization code plus verifier for tokens
    async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        exchange: &CodeExchange,
    ) -> Result<TokenResponse>;

    /// Exchange a refresh token for a new token pair
    async fn refresh_token(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse>;

    /// Fetch the authenticated user's profile
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile>;

    /// Upload binary media, returning its media id
    async fn upload_media(&self, access_token: &str, media: MediaPayload) -> Result<String>;

    /// Create a post with optional attached media
    async fn create_post(
        &self,
        access_token: &str,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostConfirmation>;
}

/// Download of embed content from its origin.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch the bytes and declared content type behind `url`
    async fn fetch(&self, url: &str) -> Result<MediaPayload>;
}
