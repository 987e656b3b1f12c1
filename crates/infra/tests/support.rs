#![allow(dead_code)]

use std::sync::Arc;

use castbridge_domain::LinkedIdentity;
use castbridge_infra::database::DbManager;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Number of rows in `users`.
    pub fn user_count(&self) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed timestamp with whole seconds, which survive the round trip through
/// the unix-seconds column.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).single().expect("valid timestamp")
}

/// Freshly authorized, not yet linked identity.
pub fn authorized(provider_user_id: &str, access_token: &str) -> LinkedIdentity {
    LinkedIdentity {
        subject_fid: None,
        provider_user_id: provider_user_id.to_string(),
        display_name: "Alice".to_string(),
        username: "alice".to_string(),
        profile_image_url: "https://pbs.twimg.com/alice.jpg".to_string(),
        access_token: Some(access_token.to_string()),
        refresh_token: Some(format!("refresh-{access_token}")),
        token_expires_at: Some(at(12)),
        is_online: false,
    }
}
