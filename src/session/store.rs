//! Session store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ClientMeta, SessionRecord};
use crate::AuthError;

/// Persistence for session records.
///
/// Implementations:
/// - [`InMemorySessionStore`](super::InMemorySessionStore): tests and
///   single-instance deployments
/// - `SqliteSessionStore` (feature `sqlx_sqlite`): the relational backend
///
/// Expiry comparison deliberately does NOT happen here: `find_active`
/// returns rows past their expiry and leaves the clock policy to the
/// [`SessionManager`](crate::SessionManager), which is the one place that
/// decides validity.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new active session row and returns it.
    async fn create(
        &self,
        principal_id: i64,
        fingerprint: &str,
        meta: &ClientMeta,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionRecord, AuthError>;

    /// Returns the session row matching `fingerprint`, only if still active.
    async fn find_active(&self, fingerprint: &str) -> Result<Option<SessionRecord>, AuthError>;

    /// Advances `last_activity_at`. Advisory: callers must not let a failure
    /// here block a successful authentication. Never moves the timestamp
    /// backwards.
    async fn touch(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), AuthError>;

    /// Marks a session inactive. Idempotent.
    async fn deactivate(&self, session_id: &str) -> Result<(), AuthError>;

    /// Marks every session of a principal inactive (forced revocation).
    async fn deactivate_all_for_principal(&self, principal_id: i64) -> Result<(), AuthError>;

    /// Bulk-deactivates sessions past expiry. Runs out of the request path.
    ///
    /// Returns the number of sessions deactivated.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}
