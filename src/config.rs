//! Configuration for the authentication core.
//!
//! # Example
//!
//! ```rust
//! use volunhub::config::AuthConfig;
//! use volunhub::SecretString;
//! use chrono::Duration;
//!
//! let config = AuthConfig::new(SecretString::new(
//!     "a-signing-secret-of-at-least-32-bytes!!",
//! ));
//! assert_eq!(config.session_ttl, Duration::hours(12));
//! ```

use chrono::Duration;

use crate::crypto::SecretString;
use crate::AuthError;

/// `SameSite` attribute for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::None => "None",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

/// Attributes of the session cookie set on login.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "volunhub_session".to_owned(),
            path: "/".to_owned(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }
}

/// Main configuration for the authentication core.
///
/// The session TTL drives both the token's embedded expiry and the stored
/// session row's `expires_at` - they are always issued in lockstep.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of a session from issuance. Default: 12 hours.
    pub session_ttl: Duration,

    /// HMAC secret for signing credentials. At least 32 bytes.
    pub signing_secret: SecretString,

    /// Session cookie attributes.
    pub cookie: CookieConfig,

    /// Entry point the guard redirects unauthenticated page requests to.
    pub login_path: String,
}

impl AuthConfig {
    pub fn new(signing_secret: SecretString) -> Self {
        Self {
            session_ttl: Duration::hours(12),
            signing_secret,
            cookie: CookieConfig::default(),
            login_path: "/auth/login".to_owned(),
        }
    }

    /// Settings suitable for local development: long sessions, no `Secure`
    /// cookie flag so plain-http localhost works.
    pub fn development(signing_secret: SecretString) -> Self {
        Self {
            session_ttl: Duration::days(7),
            cookie: CookieConfig {
                secure: false,
                ..CookieConfig::default()
            },
            ..Self::new(signing_secret)
        }
    }

    /// Stricter settings: short sessions, `SameSite=Strict`.
    pub fn strict(signing_secret: SecretString) -> Self {
        Self {
            session_ttl: Duration::hours(1),
            cookie: CookieConfig {
                same_site: SameSite::Strict,
                ..CookieConfig::default()
            },
            ..Self::new(signing_secret)
        }
    }

    /// Validates the configuration. Call once at startup.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.signing_secret.len() < 32 {
            return Err(AuthError::ConfigurationError(
                "signing_secret must be at least 32 bytes".to_owned(),
            ));
        }
        if self.session_ttl <= Duration::zero() {
            return Err(AuthError::ConfigurationError(
                "session_ttl must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::new("test-signing-secret-32-bytes-long!!!")
    }

    #[test]
    fn test_default_config() {
        let config = AuthConfig::new(secret());
        assert_eq!(config.session_ttl, Duration::hours(12));
        assert_eq!(config.cookie.name, "volunhub_session");
        assert!(config.cookie.secure);
        assert!(config.cookie.http_only);
        assert_eq!(config.cookie.same_site, SameSite::Lax);
        assert_eq!(config.login_path, "/auth/login");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development(secret());
        assert_eq!(config.session_ttl, Duration::days(7));
        assert!(!config.cookie.secure);
    }

    #[test]
    fn test_strict_config() {
        let config = AuthConfig::strict(secret());
        assert_eq!(config.session_ttl, Duration::hours(1));
        assert_eq!(config.cookie.same_site, SameSite::Strict);
    }

    #[test]
    fn test_validate_short_secret() {
        let config = AuthConfig::new(SecretString::new("short"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nonpositive_ttl() {
        let config = AuthConfig {
            session_ttl: Duration::zero(),
            ..AuthConfig::new(secret())
        };
        assert!(config.validate().is_err());
    }
}
