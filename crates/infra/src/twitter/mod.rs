//! Twitter (X) integration

pub mod client;
pub mod types;

pub use client::{TwitterClient, TwitterEndpoints};
