//! # Castbridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the credential store, the provider API and media
//!   downloads
//! - The OAuth negotiation and token exchange service
//! - Token refresh, cast transformation and publishing
//! - The webhook-to-publish pipeline composing all of the above
//!
//! ## Architecture Principles
//! - Only depends on `castbridge-common` and `castbridge-domain`
//! - No database, HTTP, or framework code
//! - All external dependencies via traits
//! - Configuration is passed into each operation

pub mod auth;
pub mod bridge;
pub mod identity;
pub mod provider;
pub mod publish;
pub mod refresh;
pub mod transform;

// Re-export specific items to avoid ambiguity
pub use auth::{AuthService, AuthorizationRequest, CallbackParams, RequestContext};
pub use bridge::BridgeService;
pub use identity::ports::IdentityRepository;
pub use provider::ports::{ClientCredentials, CodeExchange, MediaFetcher, ProviderClient};
pub use publish::Publisher;
pub use refresh::{FreshToken, RefreshOutcome, TokenRefresher};
pub use transform::{cast_image_url, order_media, transform, truncate_text};
