//! Route handlers

pub mod auth;
pub mod callback;
pub mod health;
pub mod webhook;
