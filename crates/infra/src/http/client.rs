use std::time::Duration;

use castbridge_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use castbridge_domain::BridgeError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a bounded per-request timeout.
///
/// Requests are sent exactly once. Callers decide what a failure means.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, BridgeError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Any HTTP status is returned as `Ok`; only transport failures
    /// (timeouts, refused connections, invalid requests) are errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BridgeError> {
        let request = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = redacted(request.url());
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(BridgeError::from(InfraError::from(err)))
            }
        }
    }
}

/// URL without its query string, for logs.
fn redacted(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: Some(concat!("castbridge/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, BridgeError> {
        if self.timeout.is_zero() {
            return Err(BridgeError::Config("HTTP timeout must be greater than zero".into()));
        }

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Method, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_response_for_any_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn times_out_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            HttpClient::builder().timeout(Duration::from_millis(50)).build().expect("http client");
        let result = client.send(client.request(Method::GET, server.uri())).await;

        assert_eq!(result.unwrap_err(), BridgeError::Network("HTTP request timed out".into()));
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}", addr);

        let client = HttpClient::new().expect("http client");
        let result = client.send(client.request(Method::GET, &url)).await;

        assert!(matches!(result, Err(BridgeError::Network(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = HttpClient::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
