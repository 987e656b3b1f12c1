//! Embed download over HTTP

use async_trait::async_trait;
use castbridge_core::MediaFetcher;
use castbridge_domain::constants::MAX_MEDIA_BYTES;
use castbridge_domain::{BridgeError, MediaPayload, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Downloads embed URLs with the shared bounded-timeout client.
///
/// Bodies larger than `max_bytes` are rejected before they are fully read.
#[derive(Clone)]
pub struct HttpMediaFetcher {
    http: HttpClient,
    max_bytes: usize,
}

impl HttpMediaFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http, max_bytes: MAX_MEDIA_BYTES }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self, url: &str) -> BridgeError {
        BridgeError::InvalidRequest(format!("media at {url} exceeds {} bytes", self.max_bytes))
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<MediaPayload> {
        let mut response = self.http.send(self.http.request(Method::GET, url)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Network(format!(
                "HTTP {} fetching {url}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let declared = response.content_length().and_then(|len| usize::try_from(len).ok());
        if declared.is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large(url));
        }

        // Content-Length can be absent or wrong; enforce the cap while streaming.
        let mut bytes = Vec::with_capacity(declared.unwrap_or_default());
        while let Some(chunk) =
            response.chunk().await.map_err(|e| BridgeError::from(InfraError::from(e)))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url));
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!(size = bytes.len(), content_type = ?content_type, "media fetched");

        Ok(MediaPayload { bytes, content_type })
    }
}
