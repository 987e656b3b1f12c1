//! Inbound webhook payloads
//!
//! Embed descriptors arrive as loosely shaped JSON objects. They are
//! classified into [`Embed`] while the envelope is deserialized, so nothing
//! past the boundary ever inspects raw JSON.

use serde::Deserialize;
use serde_json::Value;

use crate::constants::CAST_HASH_PREFIX;

/// Signed webhook envelope `{type, data}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Option<CastData>,
}

/// Cast body of a `cast.created` event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CastData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub embeds: Option<Vec<Embed>>,
    #[serde(default)]
    pub author: Option<CastAuthor>,
    /// Any non-null value marks the cast as a reply.
    #[serde(default)]
    pub parent_hash: Option<Value>,
}

/// Cast author reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CastAuthor {
    #[serde(default)]
    pub fid: Option<u64>,
}

/// Reference to another cast, rendered through the image proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastReference {
    pub hash: String,
}

/// One classified embed descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum Embed {
    /// `{cast_id: {fid: <number>, hash: "0x..."}}`
    Cast(CastReference),
    /// `{url: "..."}`
    Url(String),
    /// Any other shape. Dropped by the transformer.
    Unsupported,
}

impl From<Value> for Embed {
    fn from(value: Value) -> Self {
        if let Some(reference) = value.get("cast_id").and_then(cast_reference) {
            return Self::Cast(reference);
        }

        match value.get("url").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Self::Url(url.to_string()),
            _ => Self::Unsupported,
        }
    }
}

fn cast_reference(cast_id: &Value) -> Option<CastReference> {
    if !cast_id.get("fid").is_some_and(Value::is_number) {
        return None;
    }

    let hash = cast_id.get("hash").and_then(Value::as_str)?;
    (hash.len() > 1 && hash.starts_with(CAST_HASH_PREFIX))
        .then(|| CastReference { hash: hash.to_string() })
}
