//! Media re-hosting and post submission

pub mod service;

pub use service::Publisher;
