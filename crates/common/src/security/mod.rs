//! Request authentication helpers

pub mod webhook;

pub use webhook::{SignatureError, WebhookVerifier};
