//! PKCE negotiator and token exchanger
//!
//! `begin_auth` issues the authorization redirect and parks the verifier in
//! the session store under the generated `state`. `complete_callback` claims
//! that session (destroying it on every path), exchanges the code and upserts
//! the linked identity.

use std::sync::Arc;

use castbridge_common::auth::{OAuthError, PKCEChallenge, PkceSessionStore};
use castbridge_domain::constants::{CALLBACK_PATH, TWITTER_AUTHORIZE_URL, TWITTER_OAUTH_SCOPES};
use castbridge_domain::{BridgeError, LinkedIdentity, OAuthSettings, ProviderTokens, Result};
use chrono::Utc;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::identity::ports::IdentityRepository;
use crate::provider::ports::{ClientCredentials, CodeExchange, ProviderClient};

/// Host and scheme of the inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: String,
    pub host: Option<String>,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: Option<String>) -> Self {
        Self { scheme: scheme.into(), host }
    }

    /// True when the request targets a `localhost` host.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        self.host.as_deref().is_some_and(|host| host.contains("localhost"))
    }

    /// Callback URL for this request.
    ///
    /// Loopback requests call back to the same host; everything else uses the
    /// configured production URL.
    pub fn redirect_uri(&self, oauth: &OAuthSettings) -> Result<String> {
        match self.host.as_deref() {
            Some(host) if self.is_loopback() => {
                Ok(format!("{}://{}{}", self.scheme, host, CALLBACK_PATH))
            }
            _ => oauth.callback_url().map(str::to_string),
        }
    }
}

/// Everything the caller needs to send the user to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

/// Query parameters of the provider callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// OAuth 2.0 + PKCE negotiation against the provider.
pub struct AuthService {
    identities: Arc<dyn IdentityRepository>,
    provider: Arc<dyn ProviderClient>,
    sessions: PkceSessionStore,
    authorize_endpoint: String,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        provider: Arc<dyn ProviderClient>,
        sessions: PkceSessionStore,
    ) -> Self {
        Self { identities, provider, sessions, authorize_endpoint: TWITTER_AUTHORIZE_URL.into() }
    }

    /// Override the authorization endpoint.
    #[must_use]
    pub fn with_authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = endpoint.into();
        self
    }

    /// Pending PKCE sessions.
    pub fn sessions(&self) -> &PkceSessionStore {
        &self.sessions
    }

    /// Start an authorization: build the provider URL and register the
    /// verifier under the generated state.
    ///
    /// Nothing is registered when configuration is missing.
    pub fn begin_auth(
        &self,
        oauth: &OAuthSettings,
        context: &RequestContext,
    ) -> Result<AuthorizationRequest> {
        let client_id = oauth.client_id()?;
        let redirect_uri = context.redirect_uri(oauth)?;

        let request = self.authorization_request(client_id, &redirect_uri)?;
        self.sessions.insert(request.state.clone(), request.code_verifier.clone());

        info!(loopback = context.is_loopback(), "authorization started");
        Ok(request)
    }

    /// Build an authorization URL against the configured callback without
    /// registering a session. The caller receives the verifier directly.
    pub fn authorization_tokens(&self, oauth: &OAuthSettings) -> Result<AuthorizationRequest> {
        let client_id = oauth.client_id()?;
        let redirect_uri = oauth.callback_url()?;
        self.authorization_request(client_id, redirect_uri)
    }

    fn authorization_request(
        &self,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<AuthorizationRequest> {
        let pkce = PKCEChallenge::generate();

        let url = Url::parse_with_params(
            &self.authorize_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("scope", TWITTER_OAUTH_SCOPES),
                ("code_challenge", pkce.code_challenge.as_str()),
                ("code_challenge_method", pkce.challenge_method()),
                ("state", pkce.state.as_str()),
            ],
        )
        .map_err(|e| BridgeError::Config(format!("invalid authorization endpoint: {e}")))?;

        Ok(AuthorizationRequest {
            url: url.into(),
            code_verifier: pkce.code_verifier,
            code_challenge: pkce.code_challenge,
            state: pkce.state,
        })
    }

    /// Handle the provider callback end to end.
    ///
    /// The pending session for `state` is destroyed before anything else so
    /// it cannot be replayed whatever the outcome. When no session matches,
    /// `cookie_verifier` is used instead.
    #[instrument(skip_all, fields(has_code = params.code.is_some(), has_state = params.state.is_some()))]
    pub async fn complete_callback(
        &self,
        oauth: &OAuthSettings,
        context: &RequestContext,
        params: CallbackParams,
        cookie_verifier: Option<&str>,
    ) -> Result<LinkedIdentity> {
        let session_verifier = params.state.as_deref().and_then(|state| self.sessions.take(state));

        if let Some(error) = params.error {
            let error = OAuthError { error, error_description: params.error_description };
            warn!(error = %error, "provider reported authorization error");
            return Err(BridgeError::InvalidRequest(format!("OAuth error: {error}")));
        }

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| BridgeError::InvalidRequest("Missing authorization code".into()))?;

        let code_verifier = session_verifier
            .or_else(|| cookie_verifier.map(str::to_string))
            .filter(|verifier| !verifier.is_empty())
            .ok_or_else(|| {
                warn!("callback arrived without a code verifier");
                BridgeError::InvalidRequest(
                    "Missing code verifier. Please try authenticating again.".into(),
                )
            })?;

        let redirect_uri = context.redirect_uri(oauth)?;
        self.complete_auth(oauth, &code, &code_verifier, &redirect_uri).await
    }

    /// Exchange the code, fetch the profile and upsert the identity.
    pub async fn complete_auth(
        &self,
        oauth: &OAuthSettings,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<LinkedIdentity> {
        let credentials = ClientCredentials::from_settings(oauth)?;
        let exchange = CodeExchange {
            code: code.to_string(),
            code_verifier: code_verifier.to_string(),
            redirect_uri: redirect_uri.to_string(),
        };

        let response =
            self.provider.exchange_code(&credentials, &exchange).await.map_err(|err| {
                error!(error = %err, "authorization code exchange failed");
                upstream(err)
            })?;

        let expires_at = response.expires_at(Utc::now());
        let access_token =
            response.access_token.filter(|token| !token.is_empty()).ok_or_else(|| {
                error!("token response did not include an access token");
                BridgeError::UpstreamAuth("Failed to obtain access token".into())
            })?;

        let profile = self.provider.fetch_profile(&access_token).await.map_err(|err| {
            error!(error = %err, "profile fetch failed after code exchange");
            upstream(err)
        })?;

        let tokens =
            ProviderTokens { access_token, refresh_token: response.refresh_token, expires_at };
        let identity = LinkedIdentity::from_authorization(profile, tokens);
        self.identities.upsert(&identity).await?;

        info!(provider_user_id = %identity.provider_user_id, "identity linked");
        Ok(identity)
    }
}

fn upstream(err: BridgeError) -> BridgeError {
    match err {
        BridgeError::UpstreamAuth(_) | BridgeError::Config(_) => err,
        other => BridgeError::UpstreamAuth(other.message().to_string()),
    }
}
