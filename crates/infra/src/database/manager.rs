//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use castbridge_common::storage::{SqliteConnection, SqlitePool, SqlitePoolConfig};
use castbridge_domain::{BridgeError, Result};
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open the database at `db_path` with up to `pool_size` connections.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BridgeError::Database(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let config = SqlitePoolConfig { max_size: pool_size.max(1), ..SqlitePoolConfig::default() };
        let pool = SqlitePool::new(&path, config).map_err(|e| BridgeError::from(InfraError::from(e)))?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(|e| BridgeError::from(InfraError::from(e)))
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `SELECT 1` on a pooled connection.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> BridgeError {
    BridgeError::from(InfraError::from(err))
}
