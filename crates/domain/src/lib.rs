//! # Castbridge Domain
//!
//! Business domain types and models for the cast bridge.
//!
//! This crate contains:
//! - Linked identity, inbound event and outbound post types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Provider endpoints and publishing limits
//!
//! ## Architecture
//! - No dependencies on other castbridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
