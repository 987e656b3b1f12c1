//! Linked identity persistence

pub mod ports;

pub use ports::IdentityRepository;
