//! OAuth 2.0 + PKCE building blocks
//!
//! # Architecture
//!
//! ```text
//! /api/auth ──► PKCEChallenge::generate ──► PkceSessionStore::insert(state)
//!                                                │
//! /api/callback ◄── provider redirect ◄──────────┘
//!      │
//!      └──► PkceSessionStore::take(state) ──► token exchange (TokenResponse)
//! ```
//!
//! The store hands each verifier out at most once and forgets it after
//! ten minutes whether or not it was claimed.

pub mod pkce;
#[cfg(feature = "runtime")]
pub mod session;
pub mod types;

pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, PKCEChallenge};
#[cfg(feature = "runtime")]
pub use session::PkceSessionStore;
pub use types::{OAuthError, TokenResponse};
