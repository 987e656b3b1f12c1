//! Lazy access-token renewal
//!
//! Refresh is best effort. Any failure is logged and reported as
//! [`RefreshOutcome::Degraded`], and the stale access token is handed back so
//! the publish attempt still happens.

use std::sync::Arc;

use castbridge_domain::{BridgeError, LinkedIdentity, OAuthSettings, ProviderTokens, Result};
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::identity::ports::IdentityRepository;
use crate::provider::ports::{ClientCredentials, ProviderClient};

/// What `ensure_fresh_token` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Token not expired (or no expiry recorded); nothing was done.
    Fresh,
    /// Token was renewed. `persisted` is false when the store update failed.
    Refreshed { persisted: bool },
    /// Token is expired and could not be renewed; the stale one is returned.
    Degraded { reason: String },
}

/// Access token to use plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshToken {
    pub access_token: String,
    pub outcome: RefreshOutcome,
}

/// Token refresh against the provider's token endpoint.
pub struct TokenRefresher {
    identities: Arc<dyn IdentityRepository>,
    provider: Arc<dyn ProviderClient>,
}

impl TokenRefresher {
    /// Create a new token refresher
    pub fn new(identities: Arc<dyn IdentityRepository>, provider: Arc<dyn ProviderClient>) -> Self {
        Self { identities, provider }
    }

    /// Return a usable access token for `identity`, renewing it first when
    /// the recorded expiry has passed.
    ///
    /// On a successful refresh `identity` is updated in place and the new
    /// tokens are written to the store. A provider that omits a new refresh
    /// token leaves the old one in place.
    ///
    /// # Errors
    /// `Authentication` when the identity holds no access token at all.
    pub async fn ensure_fresh_token(
        &self,
        oauth: &OAuthSettings,
        identity: &mut LinkedIdentity,
    ) -> Result<FreshToken> {
        self.ensure_fresh_token_at(oauth, identity, Utc::now()).await
    }

    #[instrument(skip_all, fields(provider_user_id = %identity.provider_user_id))]
    async fn ensure_fresh_token_at(
        &self,
        oauth: &OAuthSettings,
        identity: &mut LinkedIdentity,
        now: DateTime<Utc>,
    ) -> Result<FreshToken> {
        let stale = identity.access_token.clone().ok_or_else(|| {
            BridgeError::Authentication("Twitter OAuth 2.0 access token not found".into())
        })?;

        if !identity.token_expired_at(now) {
            return Ok(FreshToken { access_token: stale, outcome: RefreshOutcome::Fresh });
        }

        let Some(refresh_token) = identity.refresh_token.clone() else {
            warn!("access token expired and no refresh token is stored");
            return Ok(degraded(stale, "no refresh token stored"));
        };

        let credentials = match ClientCredentials::from_settings(oauth) {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!(error = %err, "missing OAuth configuration for token refresh");
                return Ok(degraded(stale, err.message()));
            }
        };

        let response = match self.provider.refresh_token(&credentials, &refresh_token).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh failed; continuing with expired token");
                return Ok(degraded(stale, err.message()));
            }
        };

        let expires_at = response.expires_at(now);
        let Some(access_token) = response.access_token.filter(|token| !token.is_empty()) else {
            warn!("refresh response did not include an access token");
            return Ok(degraded(stale, "refresh response without access token"));
        };

        let tokens = ProviderTokens {
            access_token: access_token.clone(),
            refresh_token: response.refresh_token.or(Some(refresh_token)),
            expires_at,
        };

        identity.access_token = Some(tokens.access_token.clone());
        identity.refresh_token.clone_from(&tokens.refresh_token);
        identity.token_expires_at = tokens.expires_at;

        let persisted =
            match self.identities.update_tokens(&identity.provider_user_id, &tokens).await {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "refreshed tokens could not be persisted");
                    false
                }
            };

        info!(persisted, "access token refreshed");
        Ok(FreshToken { access_token, outcome: RefreshOutcome::Refreshed { persisted } })
    }
}

fn degraded(stale: String, reason: impl Into<String>) -> FreshToken {
    FreshToken { access_token: stale, outcome: RefreshOutcome::Degraded { reason: reason.into() } }
}
