//! OAuth 2.0 negotiation and token exchange

pub mod service;

pub use service::{AuthService, AuthorizationRequest, CallbackParams, RequestContext};
