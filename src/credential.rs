//! Credential codec: signing and verification of the session token.
//!
//! The credential is a compact HS256-signed token embedding the principal's
//! id, role, a few display claims, and an expiry fixed at issuance. It is
//! never persisted verbatim; the session store keeps only its fingerprint
//! (see [`crate::crypto::fingerprint`]).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::crypto::SecretString;
use crate::principal::{Principal, Role};
use crate::AuthError;

/// Claims embedded in a credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the principal id.
    pub sub: String,
    /// Role at issuance time.
    pub role: Role,
    /// Display name, for convenience only.
    pub name: String,
    /// Email, for convenience only.
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiry (Unix timestamp). Fixed at issuance, never extended.
    pub exp: i64,
}

impl Claims {
    pub fn principal_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenMalformed)
    }

    /// Reconstructs the principal the token was issued to.
    pub fn to_principal(&self) -> Result<Principal, AuthError> {
        Ok(Principal {
            id: self.principal_id()?,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        })
    }
}

/// Signs and verifies credentials. Pure: a function of input, key and clock.
#[derive(Clone)]
pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl CredentialCodec {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        }
    }

    /// Issues a signed credential for `principal` expiring `ttl` from now.
    ///
    /// Returns the token together with its embedded expiry so the caller can
    /// create the session row with the exact same instant.
    pub fn issue(
        &self,
        principal: &Principal,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: principal.id.to_string(),
            role: principal.role,
            name: principal.name.clone(),
            email: principal.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::SigningError)?;

        Ok((token, expires_at))
    }

    /// Verifies the signature and expiry of a credential.
    ///
    /// Failures are typed so callers can log the distinction, but all of
    /// them must be treated as "not authenticated":
    /// [`AuthError::TokenExpired`], [`AuthError::TokenSignatureMismatch`],
    /// [`AuthError::TokenMalformed`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::TokenSignatureMismatch
                }
                _ => AuthError::TokenMalformed,
            })?;

        Ok(data.claims)
    }
}
