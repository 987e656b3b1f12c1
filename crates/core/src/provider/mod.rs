//! Provider API and media origin capabilities

pub mod ports;

pub use ports::{ClientCredentials, CodeExchange, MediaFetcher, ProviderClient};
