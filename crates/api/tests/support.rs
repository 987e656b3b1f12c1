#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::SET_COOKIE;
use axum::http::{Request, Response};
use axum::Router;
use castbridge_api::{build_router, AppContext};
use castbridge_common::WebhookVerifier;
use castbridge_domain::{BridgeConfig, DatabaseConfig, OAuthSettings, WebhookSettings};
use castbridge_infra::{DbManager, HttpClient, HttpMediaFetcher, TwitterClient, TwitterEndpoints};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const WEBHOOK_SECRET: &str = "webhook-secret";

/// Router over a temporary database and a mock provider.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub router: Router,
    pub provider: MockServer,
    _temp_dir: TempDir,
}

/// Fully configured bridge.
pub fn configured(temp_dir: &TempDir) -> BridgeConfig {
    BridgeConfig {
        oauth: OAuthSettings {
            client_id: Some(CLIENT_ID.into()),
            client_secret: Some(CLIENT_SECRET.into()),
            callback_url: Some("https://bridge.example.com/api/callback".into()),
        },
        webhook: WebhookSettings { secret: Some(WEBHOOK_SECRET.into()) },
        database: DatabaseConfig {
            path: temp_dir.path().join("bridge.db").to_string_lossy().into_owned(),
            pool_size: 4,
        },
        ..BridgeConfig::default()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(configured).await
    }

    /// Start from [`configured`] and let the caller adjust it.
    pub async fn with_config(build: impl FnOnce(&TempDir) -> BridgeConfig) -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let config = build(&temp_dir);
        let provider = MockServer::start().await;

        let db = DbManager::new(&config.database.path, config.database.pool_size)
            .expect("db manager should be created");
        db.run_migrations().expect("schema migrations should apply");

        let http = HttpClient::new().expect("http client should build");
        let endpoints = TwitterEndpoints::new(provider.uri(), provider.uri());
        let twitter = Arc::new(TwitterClient::with_endpoints(http.clone(), endpoints));
        let media = Arc::new(HttpMediaFetcher::new(http));

        let ctx = Arc::new(AppContext::with_components(config, Arc::new(db), twitter, media));
        let router = build_router(Arc::clone(&ctx));

        Self { ctx, router, provider, _temp_dir: temp_dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("router should respond")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::get(uri).header("host", "localhost:3000").body(Body::empty()).unwrap(),
        )
        .await
    }

    /// POST a webhook body signed with the configured secret.
    pub async fn post_signed(&self, body: &str) -> Response<Body> {
        let signature = WebhookVerifier::new(Some(WEBHOOK_SECRET))
            .sign(body.as_bytes())
            .expect("secret is configured");
        self.post_webhook(body, Some(&signature)).await
    }

    pub async fn post_webhook(&self, body: &str, signature: Option<&str>) -> Response<Body> {
        let mut request =
            Request::post("/api/webhook").header("content-type", "application/json");
        if let Some(signature) = signature {
            request = request.header("x-neynar-signature", signature);
        }
        self.send(request.body(Body::from(body.to_string())).unwrap()).await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body should be json")
}

/// Every `Set-Cookie` value on the response.
pub fn set_cookies<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Value of a query parameter in an absolute or relative URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| urlencoding::decode(value).ok().map(|v| v.into_owned())).flatten()
    })
}
