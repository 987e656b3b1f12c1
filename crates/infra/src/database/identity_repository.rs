//! Linked identity repository backed by SQLite
//!
//! One row per Twitter account in the `users` table. Writes keyed by the
//! Twitter user id, reads by either id or Farcaster fid.

use std::sync::Arc;

use async_trait::async_trait;
use castbridge_core::IdentityRepository;
use castbridge_domain::{BridgeError, LinkedIdentity, ProviderTokens, Result as DomainResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

const SELECT_COLUMNS: &str = "SELECT fid, twitter_user_id, display_name, twitter_username,
        profile_image_url, twitter_access_token, twitter_refresh_token,
        twitter_token_expires_at, is_online
 FROM users";

/// SQLite-backed implementation of [`IdentityRepository`]
pub struct SqliteIdentityRepository {
    db: Arc<DbManager>,
}

impl SqliteIdentityRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DomainResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<T> {
            let conn = db.get_connection()?;
            op(&conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl IdentityRepository for SqliteIdentityRepository {
    async fn find_by_subject(&self, fid: u64) -> DomainResult<Option<LinkedIdentity>> {
        let fid = fid_to_sql(fid)?;
        self.run(move |conn| {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE fid = ?1"),
                params![fid],
                map_identity_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
    }

    async fn find_by_provider_id(
        &self,
        provider_user_id: &str,
    ) -> DomainResult<Option<LinkedIdentity>> {
        let provider_user_id = provider_user_id.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE twitter_user_id = ?1"),
                params![provider_user_id],
                map_identity_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
    }

    async fn upsert(&self, identity: &LinkedIdentity) -> DomainResult<()> {
        let identity = identity.clone();
        let fid = identity.subject_fid.map(fid_to_sql).transpose()?;
        self.run(move |conn| {
            let now = Utc::now().timestamp();
            conn.execute(
                "INSERT INTO users (
                    fid, twitter_user_id, display_name, twitter_username, profile_image_url,
                    twitter_access_token, twitter_refresh_token, twitter_token_expires_at,
                    is_online, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
                 ON CONFLICT(twitter_user_id) DO UPDATE SET
                    display_name = excluded.display_name,
                    twitter_username = excluded.twitter_username,
                    profile_image_url = excluded.profile_image_url,
                    twitter_access_token = excluded.twitter_access_token,
                    twitter_refresh_token = excluded.twitter_refresh_token,
                    twitter_token_expires_at = excluded.twitter_token_expires_at,
                    updated_at = excluded.updated_at",
                params![
                    fid,
                    identity.provider_user_id,
                    identity.display_name,
                    identity.username,
                    identity.profile_image_url,
                    identity.access_token,
                    identity.refresh_token,
                    identity.token_expires_at.map(|t| t.timestamp()),
                    identity.is_online,
                    now,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }

    async fn update_tokens(
        &self,
        provider_user_id: &str,
        tokens: &ProviderTokens,
    ) -> DomainResult<()> {
        let provider_user_id = provider_user_id.to_string();
        let tokens = tokens.clone();
        self.run(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE users SET
                        twitter_access_token = ?1,
                        twitter_refresh_token = ?2,
                        twitter_token_expires_at = ?3,
                        updated_at = ?4
                     WHERE twitter_user_id = ?5",
                    params![
                        tokens.access_token,
                        tokens.refresh_token,
                        tokens.expires_at.map(|t| t.timestamp()),
                        Utc::now().timestamp(),
                        provider_user_id,
                    ],
                )
                .map_err(map_sql_error)?;
            require_row(changed, &provider_user_id)
        })
        .await
    }

    async fn link_subject(&self, provider_user_id: &str, fid: u64) -> DomainResult<()> {
        let provider_user_id = provider_user_id.to_string();
        let fid = fid_to_sql(fid)?;
        self.run(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE users SET fid = ?1, updated_at = ?2 WHERE twitter_user_id = ?3",
                    params![fid, Utc::now().timestamp(), provider_user_id],
                )
                .map_err(map_sql_error)?;
            require_row(changed, &provider_user_id)
        })
        .await
    }

    async fn set_online(&self, provider_user_id: &str, online: bool) -> DomainResult<()> {
        let provider_user_id = provider_user_id.to_string();
        self.run(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE users SET is_online = ?1, updated_at = ?2 WHERE twitter_user_id = ?3",
                    params![online, Utc::now().timestamp(), provider_user_id],
                )
                .map_err(map_sql_error)?;
            require_row(changed, &provider_user_id)
        })
        .await
    }
}

fn map_identity_row(row: &Row<'_>) -> rusqlite::Result<LinkedIdentity> {
    let fid: Option<i64> = row.get(0)?;
    let expires_at: Option<i64> = row.get(7)?;

    Ok(LinkedIdentity {
        subject_fid: fid.and_then(|value| u64::try_from(value).ok()),
        provider_user_id: row.get(1)?,
        display_name: row.get(2)?,
        username: row.get(3)?,
        profile_image_url: row.get(4)?,
        access_token: row.get(5)?,
        refresh_token: row.get(6)?,
        token_expires_at: expires_at.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        is_online: row.get(8)?,
    })
}

fn fid_to_sql(fid: u64) -> DomainResult<i64> {
    i64::try_from(fid).map_err(|_| BridgeError::InvalidRequest(format!("fid {fid} out of range")))
}

fn require_row(changed: usize, provider_user_id: &str) -> DomainResult<()> {
    if changed == 0 {
        return Err(BridgeError::NotFound(format!(
            "no linked identity for Twitter user {provider_user_id}"
        )));
    }
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> BridgeError {
    BridgeError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> BridgeError {
    BridgeError::Internal(format!("Task join error: {err}"))
}
