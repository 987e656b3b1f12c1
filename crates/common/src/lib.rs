//! Modular common utilities shared across castbridge crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: PKCE primitives and OAuth wire types
//! - `runtime`: single-use PKCE session store
//! - `platform`: SQLite pool and webhook signature verification

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{PKCEChallenge, TokenResponse};
#[cfg(feature = "runtime")]
pub use auth::PkceSessionStore;
#[cfg(feature = "platform")]
pub use security::{SignatureError, WebhookVerifier};
#[cfg(feature = "platform")]
pub use storage::{SqlitePool, SqlitePoolConfig, StorageError, StorageResult};
