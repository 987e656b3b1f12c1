//! Outbound post types

use serde::{Deserialize, Serialize};

/// Text and media ready to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundPost {
    pub text: String,
    /// Media to re-host, in attachment order.
    pub media_urls: Vec<String>,
}

/// A validated cast: who wrote it and what to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCast {
    pub author_fid: u64,
    pub post: OutboundPost,
}

/// Downloaded embed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Post confirmation returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostConfirmation {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Embed that was left out of the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMedia {
    pub url: String,
    pub reason: String,
}

/// Outcome of a publish: the confirmation plus what happened to each embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub post: PostConfirmation,
    pub media_ids: Vec<String>,
    pub skipped: Vec<SkippedMedia>,
}
