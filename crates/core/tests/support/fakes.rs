//! In-memory port implementations
//!
//! Every fake records the calls it receives so tests can assert on side
//! effects (or their absence).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use castbridge_common::auth::TokenResponse;
use castbridge_core::{ClientCredentials, CodeExchange, IdentityRepository, MediaFetcher, ProviderClient};
use castbridge_domain::{
    BridgeError, LinkedIdentity, MediaPayload, PostConfirmation, ProviderProfile, ProviderTokens,
    Result as DomainResult,
};

/// In-memory `IdentityRepository` keyed by provider user id.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    rows: Mutex<HashMap<String, LinkedIdentity>>,
    writes: AtomicUsize,
}

impl InMemoryIdentityRepository {
    /// Seed the store with existing identities.
    pub fn with_identities(identities: impl IntoIterator<Item = LinkedIdentity>) -> Self {
        let rows =
            identities.into_iter().map(|identity| (identity.provider_user_id.clone(), identity));
        Self { rows: Mutex::new(rows.collect()), writes: AtomicUsize::new(0) }
    }

    pub fn get(&self, provider_user_id: &str) -> Option<LinkedIdentity> {
        self.rows.lock().unwrap().get(provider_user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Number of mutating calls received.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_subject(&self, fid: u64) -> DomainResult<Option<LinkedIdentity>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|identity| identity.subject_fid == Some(fid)).cloned())
    }

    async fn find_by_provider_id(
        &self,
        provider_user_id: &str,
    ) -> DomainResult<Option<LinkedIdentity>> {
        Ok(self.get(provider_user_id))
    }

    async fn upsert(&self, identity: &LinkedIdentity) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&identity.provider_user_id) {
            Some(existing) => {
                existing.display_name.clone_from(&identity.display_name);
                existing.username.clone_from(&identity.username);
                existing.profile_image_url.clone_from(&identity.profile_image_url);
                existing.access_token.clone_from(&identity.access_token);
                existing.refresh_token.clone_from(&identity.refresh_token);
                existing.token_expires_at = identity.token_expires_at;
            }
            None => {
                rows.insert(identity.provider_user_id.clone(), identity.clone());
            }
        }
        Ok(())
    }

    async fn update_tokens(
        &self,
        provider_user_id: &str,
        tokens: &ProviderTokens,
    ) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(provider_user_id)
            .ok_or_else(|| BridgeError::NotFound(provider_user_id.to_string()))?;
        row.access_token = Some(tokens.access_token.clone());
        row.refresh_token.clone_from(&tokens.refresh_token);
        row.token_expires_at = tokens.expires_at;
        Ok(())
    }

    async fn link_subject(&self, provider_user_id: &str, fid: u64) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(provider_user_id) {
            row.subject_fid = Some(fid);
        }
        Ok(())
    }

    async fn set_online(&self, provider_user_id: &str, online: bool) -> DomainResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(provider_user_id) {
            row.is_online = online;
        }
        Ok(())
    }
}

/// A call received by [`FakeProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Exchange(CodeExchange),
    Refresh { refresh_token: String },
    Profile { access_token: String },
    Upload { access_token: String, bytes: Vec<u8> },
    Post { access_token: String, text: String, media_ids: Vec<String> },
}

/// Scriptable `ProviderClient`.
pub struct FakeProvider {
    pub exchange_response: Mutex<DomainResult<TokenResponse>>,
    pub refresh_response: Mutex<DomainResult<TokenResponse>>,
    pub profile: Mutex<DomainResult<ProviderProfile>>,
    pub post_response: Mutex<DomainResult<PostConfirmation>>,
    calls: Mutex<Vec<ProviderCall>>,
    uploads: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            exchange_response: Mutex::new(Ok(token_response("access-new", Some("refresh-new")))),
            refresh_response: Mutex::new(Ok(token_response("access-new", Some("refresh-new")))),
            profile: Mutex::new(Ok(ProviderProfile {
                id: "tw-1001".into(),
                name: "Alice".into(),
                username: "alice".into(),
                profile_image_url: "https://pbs.example.com/alice.png".into(),
            })),
            post_response: Mutex::new(Ok(PostConfirmation {
                id: "post-1".into(),
                text: "posted".into(),
            })),
            calls: Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(|call| matches!(call, ProviderCall::Post { .. })).collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Token response with a two-hour lifetime.
pub fn token_response(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: Some(access.into()),
        refresh_token: refresh.map(str::to_string),
        token_type: Some("bearer".into()),
        expires_in: Some(7200),
        scope: Some("tweet.read tweet.write users.read offline.access".into()),
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn exchange_code(
        &self,
        _credentials: &ClientCredentials,
        exchange: &CodeExchange,
    ) -> DomainResult<TokenResponse> {
        self.record(ProviderCall::Exchange(exchange.clone()));
        self.exchange_response.lock().unwrap().clone()
    }

    async fn refresh_token(
        &self,
        _credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> DomainResult<TokenResponse> {
        self.record(ProviderCall::Refresh { refresh_token: refresh_token.into() });
        self.refresh_response.lock().unwrap().clone()
    }

    async fn fetch_profile(&self, access_token: &str) -> DomainResult<ProviderProfile> {
        self.record(ProviderCall::Profile { access_token: access_token.into() });
        self.profile.lock().unwrap().clone()
    }

    async fn upload_media(&self, access_token: &str, media: MediaPayload) -> DomainResult<String> {
        self.record(ProviderCall::Upload {
            access_token: access_token.into(),
            bytes: media.bytes.clone(),
        });
        if media.bytes == b"reject-upload" {
            return Err(BridgeError::Network("upload rejected".into()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("media-{n}"))
    }

    async fn create_post(
        &self,
        access_token: &str,
        text: &str,
        media_ids: &[String],
    ) -> DomainResult<PostConfirmation> {
        self.record(ProviderCall::Post {
            access_token: access_token.into(),
            text: text.into(),
            media_ids: media_ids.to_vec(),
        });
        self.post_response.lock().unwrap().clone()
    }
}

/// `MediaFetcher` serving canned bodies; unknown URLs fail.
#[derive(Default)]
pub struct FakeMediaFetcher {
    bodies: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeMediaFetcher {
    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for FakeMediaFetcher {
    async fn fetch(&self, url: &str) -> DomainResult<MediaPayload> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .map(|bytes| MediaPayload {
                bytes: bytes.clone(),
                content_type: Some("image/png".into()),
            })
            .ok_or_else(|| BridgeError::Network(format!("HTTP 404 fetching {url}")))
    }
}
