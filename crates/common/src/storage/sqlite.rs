//! SQLite connection pool
//!
//! r2d2 pool over `rusqlite` with WAL mode, foreign keys and a busy timeout
//! applied to every connection the pool opens.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{debug, info, instrument, warn};

use crate::storage::error::{StorageError, StorageResult};

/// Pooled SQLite connection. Derefs to [`rusqlite::Connection`].
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// SQLite pool configuration
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// How long `get` waits for a free connection
    pub connection_timeout: Duration,

    /// Busy timeout for SQLite operations
    pub busy_timeout: Duration,

    /// Enable WAL journal mode
    pub enable_wal: bool,

    /// Enable foreign key constraints
    pub enable_foreign_keys: bool,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 8,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_millis(5000),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

/// Apply connection-level pragmas
pub fn apply_connection_pragmas(conn: &Connection, config: &SqlitePoolConfig) -> StorageResult<()> {
    let mut pragma_sql = String::new();

    if config.enable_wal {
        pragma_sql.push_str("PRAGMA journal_mode=WAL;\n");
        pragma_sql.push_str("PRAGMA wal_autocheckpoint=1000;\n");
    }

    pragma_sql.push_str("PRAGMA synchronous=NORMAL;\n");

    if config.enable_foreign_keys {
        pragma_sql.push_str("PRAGMA foreign_keys=ON;\n");
    }

    conn.execute_batch(&pragma_sql)
        .map_err(|e| StorageError::Query(format!("Failed to apply pragmas: {e}")))?;

    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| StorageError::Query(format!("Failed to set busy timeout: {e}")))?;

    Ok(())
}

/// SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the file can't be opened or the pool can't hand
    /// out a first connection.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        if config.max_size == 0 {
            return Err(StorageError::InvalidConfig("pool size must be at least 1".into()));
        }

        let pragma_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pragma_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "failed to create sqlite pool");
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        info!("sqlite pool created");
        Ok(Self { pool, config })
    }

    /// Acquire a connection, waiting at most the configured timeout.
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = std::time::Instant::now();
        match self.pool.get() {
            Ok(conn) => {
                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "connection acquired");
                Ok(conn)
            }
            Err(e) => {
                warn!(error = %e, "failed to acquire sqlite connection");
                if start.elapsed() >= self.config.connection_timeout {
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    Err(StorageError::R2d2(e))
                }
            }
        }
    }

    /// Configured maximum pool size.
    #[must_use]
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }
}
