//! Storage primitives for SQLite databases
//!
//! Provides an r2d2 connection pool with per-connection pragmas and the
//! storage error type. Schema management belongs to the application.

pub mod error;
pub mod sqlite;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
