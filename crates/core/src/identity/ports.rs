//! Port interfaces for the credential store
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for linked identities.

use async_trait::async_trait;
use castbridge_domain::{LinkedIdentity, ProviderTokens, Result};

/// Persistence for linked identities, keyed by provider user id.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find the identity linked to a Farcaster fid
    async fn find_by_subject(&self, fid: u64) -> Result<Option<LinkedIdentity>>;

    /// Find the identity for a provider user id
    async fn find_by_provider_id(&self, provider_user_id: &str) -> Result<Option<LinkedIdentity>>;

    /// Insert, or overwrite profile and tokens of, the row with the same
    /// provider user id. The fid link and online flag of an existing row are
    /// left untouched.
    async fn upsert(&self, identity: &LinkedIdentity) -> Result<()>;

    /// Replace the token triple after a refresh
    async fn update_tokens(&self, provider_user_id: &str, tokens: &ProviderTokens) -> Result<()>;

    /// Attach a Farcaster fid to a provider account
    async fn link_subject(&self, provider_user_id: &str, fid: u64) -> Result<()>;

    /// Mark an identity eligible (or not) for republishing
    async fn set_online(&self, provider_user_id: &str, online: bool) -> Result<()>;
}
