//! # Castbridge Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite credential store
//! - HTTP client with bounded timeouts
//! - Twitter API client (OAuth token endpoint, profile, media, posts)
//! - Media downloads for embeds
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `castbridge-core`
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod media;
pub mod twitter;

// Re-export commonly used items
pub use database::{DbManager, SqliteIdentityRepository};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use media::HttpMediaFetcher;
pub use twitter::{TwitterClient, TwitterEndpoints};
