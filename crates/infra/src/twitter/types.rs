//! Twitter API wire types

use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper used by every v2 response.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// `POST /2/tweets` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia<'a> {
    pub media_ids: &'a [String],
}

/// `POST /1.1/media/upload.json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
}

/// Error bodies returned by the v2 API (problem details) and v1.1 (`errors`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Most specific human-readable message in the body.
    pub fn summary(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(match &self.error_description {
                Some(description) => format!("{error} - {description}"),
                None => error.clone(),
            });
        }
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .or_else(|| self.errors.iter().find_map(|entry| entry.message.clone()))
    }
}

/// Upload category for a declared content type.
pub fn media_category(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match essence.as_str() {
        "image/gif" => "tweet_gif",
        ct if ct.starts_with("video/") => "tweet_video",
        _ => "tweet_image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_category_follows_content_type() {
        assert_eq!(media_category(Some("image/png")), "tweet_image");
        assert_eq!(media_category(Some("image/GIF")), "tweet_gif");
        assert_eq!(media_category(Some("video/mp4; codecs=avc1")), "tweet_video");
        assert_eq!(media_category(None), "tweet_image");
    }

    #[test]
    fn tweet_request_omits_empty_media() {
        let request = CreateTweetRequest { text: "hi", media: None };
        assert_eq!(serde_json::to_value(&request).unwrap(), serde_json::json!({"text": "hi"}));

        let ids = vec!["m1".to_string()];
        let request = CreateTweetRequest { text: "hi", media: Some(TweetMedia { media_ids: &ids }) };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"text": "hi", "media": {"media_ids": ["m1"]}})
        );
    }

    #[test]
    fn error_summary_prefers_oauth_then_detail() {
        let oauth: ApiErrorBody = serde_json::from_str(
            r#"{"error":"invalid_request","error_description":"Value passed for the token was invalid."}"#,
        )
        .unwrap();
        assert_eq!(
            oauth.summary().as_deref(),
            Some("invalid_request - Value passed for the token was invalid.")
        );

        let problem: ApiErrorBody =
            serde_json::from_str(r#"{"title":"Forbidden","detail":"duplicate content"}"#).unwrap();
        assert_eq!(problem.summary().as_deref(), Some("duplicate content"));

        let legacy: ApiErrorBody =
            serde_json::from_str(r#"{"errors":[{"code":324,"message":"media invalid"}]}"#).unwrap();
        assert_eq!(legacy.summary().as_deref(), Some("media invalid"));
    }
}
