//! Identities and the profile collaborator interface.
//!
//! Profile lifecycle (signup, suspension, role changes) is owned elsewhere in
//! the platform; this core only reads profiles to authenticate them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AuthError;

/// Closed set of roles recognised by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Volunteer,
    Student,
    Organization,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Student => "student",
            Role::Organization => "organization",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volunteer" => Ok(Role::Volunteer),
            "student" => Ok(Role::Student),
            "organization" => Ok(Role::Organization),
            "admin" => Ok(Role::Admin),
            "super-admin" => Ok(Role::SuperAdmin),
            other => Err(AuthError::ConfigurationError(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Account standing. Suspended accounts cannot log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(AuthError::ConfigurationError(format!(
                "unknown account status: {other}"
            ))),
        }
    }
}

/// An authenticated identity, as resolved by a successful validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// A profile row as read from the profile collaborator.
///
/// The password hash never leaves this layer: it is consumed by
/// [`SessionManager::login`](crate::SessionManager::login) and skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl Profile {
    pub fn is_suspended(&self) -> bool {
        self.status == AccountStatus::Suspended
    }

    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl Profile {
    pub fn mock(id: i64, email: &str, hashed_password: &str, role: Role) -> Self {
        Profile {
            id,
            email: email.to_owned(),
            name: "Test User".to_owned(),
            hashed_password: hashed_password.to_owned(),
            role,
            status: AccountStatus::Active,
        }
    }
}

/// The profile collaborator. Read-only from this crate's perspective.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AuthError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, AuthError>;
}

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory profile collection for tests and embedding.
    #[derive(Clone, Default)]
    pub struct MockProfileRepository {
        pub profiles: Arc<Mutex<Vec<Profile>>>,
    }

    impl MockProfileRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, profile: Profile) {
            #[allow(clippy::unwrap_used)]
            self.profiles.lock().unwrap().push(profile);
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AuthError> {
            #[allow(clippy::unwrap_used)]
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.iter().find(|p| p.email == email).cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, AuthError> {
            #[allow(clippy::unwrap_used)]
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.iter().find(|p| p.id == id).cloned())
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockProfileRepository;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Volunteer,
            Role::Student,
            Role::Organization,
            Role::Admin,
            Role::SuperAdmin,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_serde_matches_as_str() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super-admin\"");
        let role: Role = serde_json::from_str("\"super-admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            "suspended".parse::<AccountStatus>().unwrap(),
            AccountStatus::Suspended
        );
        assert_eq!(AccountStatus::Active.as_str(), "active");
    }

    #[test]
    fn test_profile_serialization_skips_password() {
        let profile = Profile::mock(1, "a@x.com", "secret-hash", Role::Volunteer);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[tokio::test]
    async fn test_mock_repository_lookup() {
        let repo = MockProfileRepository::new();
        repo.push(Profile::mock(7, "vol@x.com", "hash", Role::Volunteer));

        let found = repo.find_by_email("vol@x.com").await.unwrap();
        assert_eq!(found.unwrap().id, 7);

        let found = repo.find_by_id(7).await.unwrap();
        assert_eq!(found.unwrap().email, "vol@x.com");

        assert!(repo.find_by_email("none@x.com").await.unwrap().is_none());
    }
}
