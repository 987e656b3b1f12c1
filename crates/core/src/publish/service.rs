//! Publisher service - core business logic

use std::sync::Arc;

use castbridge_domain::{
    BridgeError, LinkedIdentity, OutboundPost, PublishResult, Result, SkippedMedia,
};
use tracing::{debug, error, info, instrument, warn};

use crate::provider::ports::{MediaFetcher, ProviderClient};

/// Uploads embed media and submits the post.
pub struct Publisher {
    provider: Arc<dyn ProviderClient>,
    media: Arc<dyn MediaFetcher>,
}

impl Publisher {
    /// Create a new publisher
    pub fn new(provider: Arc<dyn ProviderClient>, media: Arc<dyn MediaFetcher>) -> Self {
        Self { provider, media }
    }

    /// Fail unless the identity may publish: online and holding a token.
    pub fn check_eligibility(identity: &LinkedIdentity) -> Result<&str> {
        if !identity.is_online {
            return Err(BridgeError::Authorization("User is not online".into()));
        }

        identity.access_token.as_deref().ok_or_else(|| {
            error!("Twitter OAuth 2.0 access token not found");
            BridgeError::Authentication("Twitter OAuth 2.0 access token not found".into())
        })
    }

    /// Publish `post` on behalf of `identity`.
    ///
    /// Embeds are fetched and uploaded one at a time in order. An embed that
    /// fails is recorded in [`PublishResult::skipped`] and left out; only a
    /// failed submit fails the call.
    #[instrument(skip_all, fields(provider_user_id = %identity.provider_user_id, embeds = post.media_urls.len()))]
    pub async fn publish(
        &self,
        identity: &LinkedIdentity,
        post: &OutboundPost,
    ) -> Result<PublishResult> {
        let access_token = Self::check_eligibility(identity)?;

        let mut media_ids = Vec::with_capacity(post.media_urls.len());
        let mut skipped = Vec::new();

        for url in &post.media_urls {
            match self.rehost(access_token, url).await {
                Ok(media_id) => {
                    debug!(%url, %media_id, "media uploaded");
                    media_ids.push(media_id);
                }
                Err(err) => {
                    warn!(%url, error = %err, "skipping embed that could not be re-hosted");
                    skipped.push(SkippedMedia { url: url.clone(), reason: err.to_string() });
                }
            }
        }

        let confirmation = self
            .provider
            .create_post(access_token, &post.text, &media_ids)
            .await
            .map_err(|err| {
                error!(error = %err, "post submission failed");
                match err {
                    BridgeError::Publish(_) => err,
                    other => BridgeError::Publish(other.message().to_string()),
                }
            })?;

        info!(post_id = %confirmation.id, media = media_ids.len(), skipped = skipped.len(), "post published");
        Ok(PublishResult { post: confirmation, media_ids, skipped })
    }

    async fn rehost(&self, access_token: &str, url: &str) -> Result<String> {
        let payload = self.media.fetch(url).await?;
        self.provider.upload_media(access_token, payload).await
    }
}
