use chrono::{DateTime, Utc};

/// Authentication lifecycle events.
///
/// Fired from the session manager; a no-op unless listeners are registered
/// via [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum AuthEvent {
    LoginSucceeded {
        principal_id: i64,
        email: String,
        at: DateTime<Utc>,
    },
    /// `reason` distinguishes unknown-principal, bad-password and suspended
    /// server-side; the client never sees the distinction.
    LoginFailed {
        email: String,
        reason: String,
        at: DateTime<Utc>,
    },
    LoggedOut {
        session_id: String,
        at: DateTime<Utc>,
    },
    /// All sessions of a principal were force-revoked (password change,
    /// admin action).
    SessionsRevoked {
        principal_id: i64,
        at: DateTime<Utc>,
    },
    SessionsSwept {
        count: u64,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Dot-separated event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "auth.login.succeeded",
            Self::LoginFailed { .. } => "auth.login.failed",
            Self::LoggedOut { .. } => "auth.logout",
            Self::SessionsRevoked { .. } => "auth.sessions.revoked",
            Self::SessionsSwept { .. } => "auth.sessions.swept",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::LoginSucceeded { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LoggedOut { at, .. }
            | Self::SessionsRevoked { at, .. }
            | Self::SessionsSwept { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let at = Utc::now();
        let event = AuthEvent::LoginFailed {
            email: "a@x.com".to_owned(),
            reason: "bad password".to_owned(),
            at,
        };
        assert_eq!(event.name(), "auth.login.failed");
        assert_eq!(event.timestamp(), at);
    }
}
