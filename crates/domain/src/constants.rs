//! Application-wide constants

// ============================================================================
// Provider endpoints
// ============================================================================

/// OAuth 2.0 authorization endpoint users are redirected to.
pub const TWITTER_AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";

/// Base URL of the v2 API (token exchange, profile, post creation).
pub const TWITTER_API_BASE_URL: &str = "https://api.twitter.com";

/// Base URL of the v1.1 media upload API.
pub const TWITTER_UPLOAD_BASE_URL: &str = "https://upload.twitter.com";

/// Scopes requested during authorization.
pub const TWITTER_OAUTH_SCOPES: &str = "tweet.read tweet.write users.read offline.access";

/// Profile fields requested from `users/me`.
pub const TWITTER_USER_FIELDS: &str = "name,username,profile_image_url";

// ============================================================================
// OAuth session
// ============================================================================

/// Lifetime of a pending PKCE session (10 minutes).
pub const PKCE_SESSION_TTL_SECS: u64 = 600;

/// Upper bound on concurrently pending PKCE sessions.
pub const PKCE_SESSION_CAPACITY: u64 = 10_000;

/// Cookie carrying the PKCE verifier between authorize and callback.
pub const CODE_VERIFIER_COOKIE: &str = "oauth_code_verifier";

/// Cookie identifying the linked provider account.
pub const IDENTITY_COOKIE: &str = "twitter_user_id";

/// Identity cookie lifetime (30 days).
pub const IDENTITY_COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Path the provider redirects back to after authorization.
pub const CALLBACK_PATH: &str = "/api/callback";

// ============================================================================
// Publishing
// ============================================================================

/// Hard ceiling on post length.
pub const MAX_POST_LENGTH: usize = 280;

/// Largest embed downloaded for re-upload (simple upload ceiling, 15 MiB).
pub const MAX_MEDIA_BYTES: usize = 15 * 1024 * 1024;

/// Marker appended to truncated text.
pub const TRUNCATION_SUFFIX: &str = "...";

/// Only event type that is republished.
pub const CAST_CREATED_EVENT: &str = "cast.created";

/// Prefix every cast hash starts with.
pub const CAST_HASH_PREFIX: &str = "0x";

/// Image proxy rendering a referenced cast.
pub const CAST_IMAGE_PROXY_URL: &str = "https://client.warpcast.com/v2/cast-image";

// ============================================================================
// Webhooks & infrastructure defaults
// ============================================================================

/// Header carrying the hex HMAC-SHA512 of the webhook body.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-neynar-signature";

/// Default timeout for outbound HTTP calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default SQLite pool size.
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;

/// Default listen address of the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
