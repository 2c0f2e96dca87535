use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::principal::{Profile, ProfileRepository};
use crate::AuthError;

#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: i64,
    email: String,
    name: String,
    hashed_password: String,
    role: String,
    status: String,
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile, AuthError> {
        // a row with an unparseable role/status is corrupt; surface it as a
        // store problem rather than misclassifying the account
        let role = self
            .role
            .parse()
            .map_err(|_| AuthError::StoreUnavailable(format!("corrupt role: {}", self.role)))?;
        let status = self
            .status
            .parse()
            .map_err(|_| AuthError::StoreUnavailable(format!("corrupt status: {}", self.status)))?;

        Ok(Profile {
            id: self.id,
            email: self.email,
            name: self.name,
            hashed_password: self.hashed_password,
            role,
            status,
        })
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AuthError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r"SELECT id, email, name, hashed_password, role, status
               FROM profiles WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "volunhub_auth", "msg=\"database error\" operation=\"find_by_email\" error=\"{e}\"");
            AuthError::StoreUnavailable(e.to_string())
        })?;

        row.map(ProfileRow::into_profile).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, AuthError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r"SELECT id, email, name, hashed_password, role, status
               FROM profiles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "volunhub_auth", "msg=\"database error\" operation=\"find_by_id\" error=\"{e}\"");
            AuthError::StoreUnavailable(e.to_string())
        })?;

        row.map(ProfileRow::into_profile).transpose()
    }
}
