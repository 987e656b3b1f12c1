//! Linked account types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One Farcaster user linked to one Twitter account.
///
/// `provider_user_id` is unique. `subject_fid` and `is_online` are maintained
/// outside the OAuth flow and are never overwritten by a re-authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedIdentity {
    pub subject_fid: Option<u64>,
    pub provider_user_id: String,
    pub display_name: String,
    pub username: String,
    pub profile_image_url: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_online: bool,
}

impl LinkedIdentity {
    /// Build a fresh, unlinked identity from a completed authorization.
    pub fn from_authorization(profile: ProviderProfile, tokens: ProviderTokens) -> Self {
        Self {
            subject_fid: None,
            provider_user_id: profile.id,
            display_name: profile.name,
            username: profile.username,
            profile_image_url: profile.profile_image_url,
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
            token_expires_at: tokens.expires_at,
            is_online: false,
        }
    }

    /// True when an expiry is recorded and it is at or before `now`.
    ///
    /// A missing expiry is treated as non-expiring.
    #[must_use]
    pub fn token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Authenticated user profile returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_image_url: String,
}

/// Token pair with an absolute expiry, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
