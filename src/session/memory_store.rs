//! In-memory session storage.
//!
//! Suitable for development, testing, and single-instance deployments.
//! Sessions are lost when the process restarts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::store::SessionStore;
use super::{ClientMeta, SessionRecord};
use crate::crypto::{generate_id, SESSION_ID_LENGTH};
use crate::AuthError;

/// Sessions in a `HashMap` behind a `RwLock`, keyed by session id.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, active or not.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
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

        self.sessions
            .write()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?
            .insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn find_active(&self, fingerprint: &str) -> Result<Option<SessionRecord>, AuthError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?;

        Ok(sessions
            .values()
            .find(|s| s.active && s.fingerprint == fingerprint)
            .cloned())
    }

    async fn touch(&self, session_id: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        if let Some(record) = self
            .sessions
            .write()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?
            .get_mut(session_id)
        {
            // last-write-wins across concurrent requests, but never backwards
            if now > record.last_activity_at {
                record.last_activity_at = now;
            }
        }

        Ok(())
    }

    async fn deactivate(&self, session_id: &str) -> Result<(), AuthError> {
        if let Some(record) = self
            .sessions
            .write()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?
            .get_mut(session_id)
        {
            record.active = false;
        }

        Ok(())
    }

    async fn deactivate_all_for_principal(&self, principal_id: i64) -> Result<(), AuthError> {
        self.sessions
            .write()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?
            .values_mut()
            .filter(|s| s.principal_id == principal_id)
            .for_each(|s| s.active = false);

        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StoreUnavailable("lock poisoned".to_owned()))?;

        let mut swept = 0u64;
        for record in sessions.values_mut() {
            if record.active && record.is_expired_at(now) {
                record.active = false;
                swept += 1;
            }
        }

        Ok(swept)
    }
}
