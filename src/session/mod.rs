//! Server-side session records.
//!
//! A session pairs a credential fingerprint with revocation and expiry
//! state. It is what makes an otherwise stateless signed token revocable.

mod memory_store;
mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory_store::InMemorySessionStore;
pub use store::SessionStore;

/// Client metadata captured at login and kept on the session row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// One row per issued credential.
///
/// Invariants:
/// - `expires_at >= created_at`
/// - valid only if `active` and not past `expires_at` and the fingerprint
///   matches the presented credential
/// - `last_activity_at` is monotonically non-decreasing and written only by
///   successful validations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub principal_id: i64,
    /// SHA-256 digest of the credential; the raw token is never stored.
    pub fingerprint: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_in: Duration) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            id: "sess123".to_owned(),
            principal_id: 1,
            fingerprint: "fp".to_owned(),
            ip: None,
            user_agent: None,
            created_at: now,
            last_activity_at: now,
            expires_at: now + expires_in,
            active: true,
        }
    }

    #[test]
    fn test_not_expired() {
        assert!(!record(Duration::hours(1)).is_expired_at(Utc::now()));
    }

    #[test]
    fn test_expired() {
        assert!(record(-Duration::hours(1)).is_expired_at(Utc::now()));
    }

    #[test]
    fn test_expiry_boundary_counts_as_expired() {
        let rec = record(Duration::zero());
        assert!(rec.is_expired_at(rec.expires_at));
    }
}
