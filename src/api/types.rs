use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::principal::{Principal, Role};
use crate::session::SessionRecord;
use crate::AuthError;

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        PrincipalResponse {
            id: principal.id,
            email: principal.email,
            name: principal.name,
            role: principal.role,
        }
    }
}

/// Confirmation payload for a successful login. The credential itself
/// travels only in the session cookie, never in the body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub principal: PrincipalResponse,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Introspection payload: is the presented credential backed by a live
/// session, and minimal metadata when it is.
#[derive(Debug, Serialize)]
pub struct SessionInfoResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionInfoResponse {
    pub fn inactive() -> Self {
        SessionInfoResponse {
            active: false,
            session_id: None,
            principal_id: None,
            expires_at: None,
        }
    }
}

impl From<SessionRecord> for SessionInfoResponse {
    fn from(record: SessionRecord) -> Self {
        SessionInfoResponse {
            active: true,
            session_id: Some(record.id),
            principal_id: Some(record.principal_id),
            expires_at: Some(record.expires_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        // only the collapsed message crosses the boundary
        ErrorResponse {
            error: err.client_message().to_owned(),
        }
    }
}
