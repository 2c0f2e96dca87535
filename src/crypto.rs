//! Password hashing, credential fingerprinting, and secret redaction.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as ArgonPasswordHasher, SaltString};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::AuthError;

/// Length of generated session ids in characters.
pub const SESSION_ID_LENGTH: usize = 32;

/// A wrapper for sensitive string data that prevents accidental logging.
///
/// `Debug` and `Display` render `[REDACTED]` instead of the content.
///
/// # Example
///
/// ```rust
/// use volunhub::crypto::SecretString;
///
/// let password = SecretString::new("hunter2");
/// assert_eq!(format!("{:?}", password), "SecretString([REDACTED])");
/// assert_eq!(password.expose_secret(), "hunter2");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the secret value. Use only at the point it is consumed,
    /// such as passing it to a hashing function.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString(s))
    }
}

/// Trait for password hashing and verification.
///
/// The default implementation is [`Argon2Hasher`]. Password verification is
/// delegated here by [`SessionManager::login`](crate::SessionManager::login).
pub trait PasswordHasher: Send + Sync {
    /// Hash a password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if the hash is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id password hasher with configurable parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    /// Number of iterations
    time_cost: u32,
    /// Degree of parallelism
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB - argon2 default
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// OWASP-recommended production settings (64 MiB, 3 iterations, 4 threads).
    #[must_use]
    pub fn production() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| AuthError::PasswordHashError)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;

        // Verification uses params from the hash, not from config
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// One-way digest of a credential, stored instead of the raw token so the
/// session table never holds a usable bearer secret.
///
/// Tokens are high-entropy signed artifacts, so a fast hash is appropriate.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a random alphanumeric identifier.
pub fn generate_id(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("token"), fingerprint("token"));
    }

    #[test]
    fn test_fingerprint_different_inputs() {
        assert_ne!(fingerprint("token1"), fingerprint("token2"));
    }

    #[test]
    fn test_fingerprint_length() {
        // SHA-256 produces 64 hex characters
        assert_eq!(fingerprint("anytoken").len(), 64);
    }

    #[test]
    fn test_generate_id_length_and_charset() {
        let id = generate_id(SESSION_ID_LENGTH);
        assert_eq!(id.len(), SESSION_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(32), generate_id(32));
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = Argon2Hasher::default();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = Argon2Hasher::default();
        let result = hasher.verify("password", "not-a-phc-string");
        assert_eq!(result.unwrap_err(), AuthError::PasswordHashError);
    }

    #[test]
    fn test_secret_string_redacted() {
        let secret = SecretString::new("my_password");
        assert_eq!(format!("{secret:?}"), "SecretString([REDACTED])");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "my_password");
    }

    #[test]
    fn test_secret_string_len() {
        assert_eq!(SecretString::new("abc").len(), 3);
        assert!(SecretString::new("").is_empty());
    }
}
