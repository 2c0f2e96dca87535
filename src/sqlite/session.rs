use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::crypto::{generate_id, SESSION_ID_LENGTH};
use crate::session::{ClientMeta, SessionRecord, SessionStore};
use crate::AuthError;

#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    principal_id: i64,
    fingerprint: String,
    ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    active: bool,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord {
            id: row.id,
            principal_id: row.principal_id,
            fingerprint: row.fingerprint,
            ip: row.ip,
            user_agent: row.user_agent,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
            active: row.active,
        }
    }
}

fn store_error(operation: &str, e: sqlx::Error) -> AuthError {
    log::error!(target: "volunhub_auth", "msg=\"database error\" operation=\"{operation}\" error=\"{e}\"");
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, fingerprint, meta), err))]
    async fn create(
        &self,
        principal_id: i64,
        fingerprint: &str,
        meta: &ClientMeta,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionRecord, AuthError> {
        let now = Utc::now();
        let record = SessionRecord {
            id: generate_id(SESSION_ID_LENGTH),
            principal_id,
            fingerprint: fingerprint.to_owned(),
            ip: meta.ip.clone(),
            user_agent: meta.user_agent.clone(),
            created_at: now,
            last_activity_at: now,
            expires_at,
            active: true,
        };

        sqlx::query(
            r"INSERT INTO sessions
               (id, principal_id, fingerprint, ip, user_agent,
                created_at, last_activity_at, expires_at, active)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&record.id)
        .bind(record.principal_id)
        .bind(&record.fingerprint)
        .bind(&record.ip)
        .bind(&record.user_agent)
        .bind(record.created_at)
        .bind(record.last_activity_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("create_session", e))?;

        Ok(record)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn find_active(&self, fingerprint: &str) -> Result<Option<SessionRecord>, AuthError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r"SELECT id, principal_id, fingerprint, ip, user_agent,
                      created_at, last_activity_at, expires_at, active
               FROM sessions WHERE fingerprint = ? AND active = 1",
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find_active", e))?;

        Ok(row.map(SessionRecord::from))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn touch(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        // the guard keeps last_activity_at monotonic under concurrent writes
        sqlx::query(
            r"UPDATE sessions SET last_activity_at = ?
               WHERE id = ? AND last_activity_at < ?",
        )
        .bind(now)
        .bind(session_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("touch", e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn deactivate(&self, session_id: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE sessions SET active = 0 WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("deactivate", e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn deactivate_all_for_principal(&self, principal_id: i64) -> Result<(), AuthError> {
        sqlx::query("UPDATE sessions SET active = 0 WHERE principal_id = ?")
            .bind(principal_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("deactivate_all_for_principal", e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        // only ever flips active 1 -> 0 on rows already past expiry, so it
        // cannot race a live validation into a false negative
        let result = sqlx::query("UPDATE sessions SET active = 0 WHERE active = 1 AND expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("sweep_expired", e))?;

        Ok(result.rows_affected())
    }
}
