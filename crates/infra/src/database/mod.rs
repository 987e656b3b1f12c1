//! Database implementations

pub mod identity_repository;
pub mod manager;

pub use identity_repository::*;
pub use manager::*;
