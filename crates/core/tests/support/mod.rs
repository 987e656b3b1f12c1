//! Shared test helpers for `castbridge-core` integration tests.
//!
//! In-memory fakes of every core port so pipeline tests can focus on
//! behaviour instead of plumbing.

#![allow(dead_code)]

pub mod fakes;

use castbridge_domain::{BridgeConfig, LinkedIdentity, OAuthSettings, WebhookSettings};
use chrono::{DateTime, Utc};

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Config with OAuth credentials and a webhook secret.
pub fn config() -> BridgeConfig {
    BridgeConfig {
        oauth: OAuthSettings {
            client_id: Some("client-id".into()),
            client_secret: Some("client-secret".into()),
            callback_url: Some("https://bridge.example.com/api/callback".into()),
        },
        webhook: WebhookSettings { secret: Some(WEBHOOK_SECRET.into()) },
        ..BridgeConfig::default()
    }
}

/// An online identity linked to `fid`.
pub fn identity(fid: u64, expires_at: Option<DateTime<Utc>>) -> LinkedIdentity {
    LinkedIdentity {
        subject_fid: Some(fid),
        provider_user_id: format!("tw-{fid}"),
        display_name: "Alice".into(),
        username: "alice".into(),
        profile_image_url: "https://pbs.example.com/alice.png".into(),
        access_token: Some("access-old".into()),
        refresh_token: Some("refresh-old".into()),
        token_expires_at: expires_at,
        is_online: true,
    }
}
