//! Session-backed authentication and role-based route authorization for the
//! volunhub volunteer platform.
//!
//! The crate is organized around three pieces:
//!
//! - [`CredentialCodec`]: signs and verifies the compact token carried in the
//!   session cookie.
//! - [`SessionManager`]: the single authority deciding "is this request
//!   authenticated, and as whom". Combines the codec with a [`SessionStore`]
//!   so that server-side revocation takes effect immediately, even for tokens
//!   that have not yet expired.
//! - The access guard (`api::guard`): intercepts requests to protected route
//!   prefixes and enforces the [`RolePolicy`].
//!
//! Storage backends are pluggable through the [`SessionStore`] and
//! [`ProfileRepository`] traits. SQLite implementations live behind the
//! `sqlx_sqlite` feature; an in-memory store is always available.

#[cfg(feature = "axum_api")]
pub mod api;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod events;
pub mod manager;
pub mod policy;
pub mod principal;
pub mod session;
#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;
pub mod validators;

use std::fmt;

pub use config::{AuthConfig, CookieConfig, SameSite};
pub use credential::{Claims, CredentialCodec};
pub use crypto::SecretString;
pub use events::register_event_listeners;
pub use manager::{LoginGrant, SessionManager};
pub use policy::{PolicyRule, RolePolicy, RouteClass};
pub use principal::{AccountStatus, Principal, Profile, ProfileRepository, Role};
pub use session::{ClientMeta, InMemorySessionStore, SessionRecord, SessionStore};

#[cfg(any(test, feature = "mocks"))]
pub use principal::MockProfileRepository;

/// Crate-wide error taxonomy.
///
/// Token-level, login-level and guard-level failures are collapsed to a
/// single generic message at the client boundary (see
/// [`client_message`](AuthError::client_message)) but kept distinct here so
/// server-side logs remain useful.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    // token-level
    TokenMalformed,
    TokenSignatureMismatch,
    TokenExpired,
    SigningError,
    // login-level
    UnknownPrincipal,
    BadPassword,
    AccountSuspended,
    // guard-level
    Unauthenticated,
    Forbidden,
    // infrastructure
    PasswordHashError,
    ConfigurationError(String),
    StoreUnavailable(String),
}

impl AuthError {
    /// The message safe to show a client.
    ///
    /// Login and token failures all render as "invalid credentials" so the
    /// response never reveals which factor failed (account enumeration,
    /// revoked-vs-expired, and so on).
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::TokenMalformed
            | AuthError::TokenSignatureMismatch
            | AuthError::TokenExpired
            | AuthError::UnknownPrincipal
            | AuthError::BadPassword
            | AuthError::AccountSuspended
            | AuthError::Unauthenticated => "invalid credentials",
            AuthError::Forbidden => "insufficient permission",
            AuthError::SigningError
            | AuthError::PasswordHashError
            | AuthError::ConfigurationError(_)
            | AuthError::StoreUnavailable(_) => "internal error",
        }
    }
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::TokenMalformed => write!(f, "Token is malformed"),
            AuthError::TokenSignatureMismatch => write!(f, "Token signature mismatch"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::SigningError => write!(f, "Failed to sign token"),
            AuthError::UnknownPrincipal => write!(f, "No account for that email"),
            AuthError::BadPassword => write!(f, "Password mismatch"),
            AuthError::AccountSuspended => write!(f, "Account is suspended"),
            AuthError::Unauthenticated => write!(f, "Not authenticated"),
            AuthError::Forbidden => write!(f, "Insufficient permission"),
            AuthError::PasswordHashError => write!(f, "Failed to process password hash"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AuthError::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_collapses_login_reasons() {
        // all three login failures must render identically
        assert_eq!(
            AuthError::UnknownPrincipal.client_message(),
            AuthError::BadPassword.client_message()
        );
        assert_eq!(
            AuthError::BadPassword.client_message(),
            AuthError::AccountSuspended.client_message()
        );
    }

    #[test]
    fn test_client_message_collapses_token_reasons() {
        assert_eq!(
            AuthError::TokenExpired.client_message(),
            AuthError::TokenSignatureMismatch.client_message()
        );
        assert_eq!(
            AuthError::TokenMalformed.client_message(),
            AuthError::Unauthenticated.client_message()
        );
    }

    #[test]
    fn test_forbidden_is_distinct_from_unauthenticated() {
        assert_ne!(
            AuthError::Forbidden.client_message(),
            AuthError::Unauthenticated.client_message()
        );
    }

    #[test]
    fn test_display_keeps_reasons_distinct() {
        assert_ne!(
            AuthError::UnknownPrincipal.to_string(),
            AuthError::BadPassword.to_string()
        );
    }
}
