//! Webhook-to-publish pipeline
//!
//! verify → parse → transform → look up identity → eligibility gate →
//! refresh → publish. Every rejection before the publish step happens
//! without writes or outbound calls.

use std::sync::Arc;

use castbridge_common::security::{SignatureError, WebhookVerifier};
use castbridge_domain::{BridgeConfig, BridgeError, PublishResult, Result, WebhookEnvelope};
use tracing::{info, instrument, warn};

use crate::identity::ports::IdentityRepository;
use crate::provider::ports::{MediaFetcher, ProviderClient};
use crate::publish::Publisher;
use crate::refresh::{RefreshOutcome, TokenRefresher};
use crate::transform::transform;

/// Republishes verified cast webhooks.
pub struct BridgeService {
    identities: Arc<dyn IdentityRepository>,
    refresher: TokenRefresher,
    publisher: Publisher,
}

impl BridgeService {
    /// Create a new bridge service
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        provider: Arc<dyn ProviderClient>,
        media: Arc<dyn MediaFetcher>,
    ) -> Self {
        Self {
            refresher: TokenRefresher::new(Arc::clone(&identities), Arc::clone(&provider)),
            publisher: Publisher::new(provider, media),
            identities,
        }
    }

    /// Authenticate the raw delivery, then republish it.
    ///
    /// The body is only parsed after its signature checks out.
    pub async fn handle_webhook(
        &self,
        config: &BridgeConfig,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<PublishResult> {
        let verifier = WebhookVerifier::new(config.webhook.secret.as_deref());
        let verified = verifier.verify(body, signature).map_err(|err| {
            warn!(error = %err, "webhook signature rejected");
            signature_error(&err)
        })?;

        let envelope: WebhookEnvelope = serde_json::from_slice(verified).map_err(|err| {
            warn!(error = %err, "webhook body is not a valid envelope");
            BridgeError::InvalidRequest("Invalid webhook payload".into())
        })?;

        self.handle_event(config, &envelope).await
    }

    /// Republish an already authenticated envelope.
    #[instrument(skip_all, fields(event_type = %envelope.event_type))]
    pub async fn handle_event(
        &self,
        config: &BridgeConfig,
        envelope: &WebhookEnvelope,
    ) -> Result<PublishResult> {
        let prepared = transform(envelope)?;

        let mut identity =
            self.identities.find_by_subject(prepared.author_fid).await?.ok_or_else(|| {
                BridgeError::NotFound("No linked Twitter account for this Farcaster user".into())
            })?;

        Publisher::check_eligibility(&identity)?;

        let fresh = self.refresher.ensure_fresh_token(&config.oauth, &mut identity).await?;
        if let RefreshOutcome::Degraded { reason } = &fresh.outcome {
            warn!(fid = prepared.author_fid, %reason, "publishing with an expired access token");
        }

        let result = self.publisher.publish(&identity, &prepared.post).await?;
        info!(fid = prepared.author_fid, post_id = %result.post.id, "cast republished");
        Ok(result)
    }
}

fn signature_error(err: &SignatureError) -> BridgeError {
    BridgeError::Authentication(format!("Invalid webhook signature: {err}"))
}
