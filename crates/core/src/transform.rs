//! Cast-to-post transformation
//!
//! Pure functions: no I/O, no clock. Text length is measured in Unicode
//! scalar values.

use castbridge_domain::constants::{
    CAST_CREATED_EVENT, CAST_IMAGE_PROXY_URL, MAX_POST_LENGTH, TRUNCATION_SUFFIX,
};
use castbridge_domain::{BridgeError, Embed, OutboundPost, PreparedCast, Result, WebhookEnvelope};

/// Validate a webhook envelope and build the post it should produce.
///
/// Rejections, in order: wrong event type or missing data, a non-null
/// parent hash (replies are not republished), a missing author fid.
pub fn transform(envelope: &WebhookEnvelope) -> Result<PreparedCast> {
    let data = match &envelope.data {
        Some(data) if envelope.event_type == CAST_CREATED_EVENT => data,
        _ => return Err(BridgeError::InvalidRequest("Invalid webhook payload".into())),
    };

    if data.parent_hash.is_some() {
        return Err(BridgeError::InvalidRequest("Parent hash is not null".into()));
    }

    let author_fid = data
        .author
        .as_ref()
        .and_then(|author| author.fid)
        .filter(|fid| *fid != 0)
        .ok_or_else(|| {
            BridgeError::InvalidRequest("Farcaster user ID (fid) not found in payload".into())
        })?;

    let text = truncate_text(data.text.as_deref().unwrap_or_default());
    let media_urls = order_media(data.embeds.as_deref().unwrap_or_default());

    Ok(PreparedCast { author_fid, post: OutboundPost { text, media_urls } })
}

/// Cap `text` at the post ceiling, replacing the overflow with `...`.
#[must_use]
pub fn truncate_text(text: &str) -> String {
    if text.chars().count() <= MAX_POST_LENGTH {
        return text.to_string();
    }

    let keep = MAX_POST_LENGTH - TRUNCATION_SUFFIX.chars().count();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}

/// Media URLs in attachment order: every cast image first, then every link,
/// each group keeping its original relative order.
#[must_use]
pub fn order_media(embeds: &[Embed]) -> Vec<String> {
    let casts = embeds.iter().filter_map(|embed| match embed {
        Embed::Cast(reference) => Some(cast_image_url(&reference.hash)),
        _ => None,
    });
    let links = embeds.iter().filter_map(|embed| match embed {
        Embed::Url(url) => Some(url.clone()),
        _ => None,
    });

    casts.chain(links).collect()
}

/// Image proxy URL rendering the cast with `hash`.
#[must_use]
pub fn cast_image_url(hash: &str) -> String {
    format!("{CAST_IMAGE_PROXY_URL}?castHash={hash}")
}
