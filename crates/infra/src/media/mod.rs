//! Embed media retrieval

pub mod fetcher;

pub use fetcher::HttpMediaFetcher;
