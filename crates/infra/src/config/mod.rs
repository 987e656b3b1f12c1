//! Configuration loading
//!
//! Loads [`castbridge_domain::BridgeConfig`] from an optional config file and
//! environment variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
