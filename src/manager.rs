//! The session manager: the single authority that decides "is this request
//! authenticated, and as whom".

use std::sync::Arc;

use chrono::Utc;

use crate::config::AuthConfig;
use crate::credential::{Claims, CredentialCodec};
use crate::crypto::{fingerprint, Argon2Hasher, PasswordHasher, SecretString};
use crate::events::{dispatch, AuthEvent};
use crate::principal::{Principal, ProfileRepository};
use crate::session::{ClientMeta, SessionRecord, SessionStore};
use crate::AuthError;

/// Everything a successful login produces: the signed credential, the
/// session row bound to its fingerprint, and the authenticated principal.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub session: SessionRecord,
    pub principal: Principal,
}

/// Orchestrates credential issuance, validation, and revocation by combining
/// the [`CredentialCodec`] with a [`SessionStore`].
///
/// Validation double-checks expiry: the token's embedded `exp` AND the stored
/// row's `expires_at`/`active` flag. The redundancy is deliberate - it is
/// what makes server-side revocation effective immediately for an otherwise
/// stateless signed token.
pub struct SessionManager<P, S> {
    profiles: P,
    sessions: S,
    codec: CredentialCodec,
    hasher: Arc<dyn PasswordHasher>,
    config: AuthConfig,
}

impl<P, S> SessionManager<P, S>
where
    P: ProfileRepository,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub fn new(profiles: P, sessions: S, config: AuthConfig) -> Self {
        let codec = CredentialCodec::new(&config.signing_secret);
        Self {
            profiles,
            sessions,
            codec,
            hasher: Arc::new(Argon2Hasher::default()),
            config,
        }
    }

    /// Replaces the password hasher (e.g. stricter production parameters).
    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticates an email/password pair and opens a session.
    ///
    /// On success the credential and the session row share the same expiry
    /// instant.
    ///
    /// The failure reasons ([`AuthError::UnknownPrincipal`],
    /// [`AuthError::BadPassword`], [`AuthError::AccountSuspended`]) must all
    /// be rendered identically to the caller; they are logged and dispatched
    /// distinctly here.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        meta: &ClientMeta,
    ) -> Result<LoginGrant, AuthError> {
        let profile = match self.profiles.find_by_email(email).await? {
            Some(profile) => profile,
            None => {
                return Err(self.login_failed(email, AuthError::UnknownPrincipal).await);
            }
        };

        if !self
            .hasher
            .verify(password.expose_secret(), &profile.hashed_password)?
        {
            return Err(self.login_failed(email, AuthError::BadPassword).await);
        }

        if profile.is_suspended() {
            return Err(self.login_failed(email, AuthError::AccountSuspended).await);
        }

        let principal = profile.to_principal();
        let (token, expires_at) = self.codec.issue(&principal, self.config.session_ttl)?;

        let record = self
            .sessions
            .create(principal.id, &fingerprint(&token), meta, expires_at)
            .await?;

        dispatch(AuthEvent::LoginSucceeded {
            principal_id: principal.id,
            email: principal.email.clone(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "volunhub_auth",
            "msg=\"login success\" principal_id={} session_id={}",
            principal.id,
            record.id
        );

        Ok(LoginGrant {
            token,
            session: record,
            principal,
        })
    }

    async fn login_failed(&self, email: &str, reason: AuthError) -> AuthError {
        log::info!(
            target: "volunhub_auth",
            "msg=\"login failed\" reason=\"{reason}\""
        );
        dispatch(AuthEvent::LoginFailed {
            email: email.to_owned(),
            reason: reason.to_string(),
            at: Utc::now(),
        })
        .await;
        reason
    }

    /// Validates a presented credential against the persisted session.
    ///
    /// Checks, in order: token signature and embedded expiry (no store access
    /// when these fail), then the stored row's `active` flag and
    /// `expires_at`. On success, `last_activity_at` is advanced on a spawned
    /// task - best effort, never on the validation path.
    ///
    /// Every failure collapses to [`AuthError::Unauthenticated`]; the
    /// distinct reason is preserved in the logs only. A store failure during
    /// the lookup also yields `Unauthenticated`: availability is never
    /// purchased at the cost of authorization correctness.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "validate", skip_all))]
    pub async fn validate(
        &self,
        token: &str,
        _meta: &ClientMeta,
    ) -> Result<Principal, AuthError> {
        let (claims, record) = self.checked_session(token).await?;
        let principal = claims.to_principal().map_err(|_| AuthError::Unauthenticated)?;

        // advisory activity timestamp, fire-and-forget
        let sessions = self.sessions.clone();
        let session_id = record.id;
        tokio::spawn(async move {
            if let Err(e) = sessions.touch(&session_id, Utc::now()).await {
                log::warn!(
                    target: "volunhub_auth",
                    "msg=\"session touch failed\" session_id={session_id} error=\"{e}\""
                );
            }
        });

        Ok(principal)
    }

    /// Returns the session row for a credential without touching activity.
    ///
    /// Used by the introspection endpoint to pre-check liveness.
    pub async fn inspect(&self, token: &str) -> Result<SessionRecord, AuthError> {
        let (_, record) = self.checked_session(token).await?;
        Ok(record)
    }

    /// Shared validation pipeline: codec verify, fingerprint lookup, stored
    /// expiry and active double-check.
    async fn checked_session(&self, token: &str) -> Result<(Claims, SessionRecord), AuthError> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(reason) => {
                log::info!(
                    target: "volunhub_auth",
                    "msg=\"credential rejected\" reason=\"{reason}\""
                );
                return Err(AuthError::Unauthenticated);
            }
        };

        let record = match self.sessions.find_active(&fingerprint(token)).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::info!(
                    target: "volunhub_auth",
                    "msg=\"no active session for credential (revoked or never issued)\""
                );
                return Err(AuthError::Unauthenticated);
            }
            Err(e) => {
                // fail closed
                log::error!(
                    target: "volunhub_auth",
                    "msg=\"session store unavailable during validation\" error=\"{e}\""
                );
                return Err(AuthError::Unauthenticated);
            }
        };

        if record.is_expired_at(Utc::now()) {
            log::info!(
                target: "volunhub_auth",
                "msg=\"stored session expired\" session_id={}",
                record.id
            );
            return Err(AuthError::Unauthenticated);
        }

        Ok((claims, record))
    }

    /// Marks a session inactive. Idempotent: revoking an unknown or already
    /// inactive session is not an error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.deactivate(session_id).await?;

        dispatch(AuthEvent::LoggedOut {
            session_id: session_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "volunhub_auth",
            "msg=\"logout\" session_id={session_id}"
        );

        Ok(())
    }

    /// Revokes the session behind a presented credential, if any.
    ///
    /// Idempotent like [`logout`](Self::logout); a credential with no live
    /// session succeeds silently.
    pub async fn logout_by_token(&self, token: &str) -> Result<(), AuthError> {
        if let Some(record) = self.sessions.find_active(&fingerprint(token)).await? {
            self.logout(&record.id).await?;
        }
        Ok(())
    }

    /// Forced revocation of every session a principal holds (password
    /// change, admin action, credential compromise).
    pub async fn logout_all(&self, principal_id: i64) -> Result<(), AuthError> {
        self.sessions
            .deactivate_all_for_principal(principal_id)
            .await?;

        dispatch(AuthEvent::SessionsRevoked {
            principal_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "volunhub_auth",
            "msg=\"all sessions revoked\" principal_id={principal_id}"
        );

        Ok(())
    }

    /// Deactivates sessions past expiry. Intended for a periodic scheduler,
    /// never the request path.
    pub async fn sweep_expired(&self) -> Result<u64, AuthError> {
        let count = self.sessions.sweep_expired(Utc::now()).await?;

        if count > 0 {
            dispatch(AuthEvent::SessionsSwept {
                count,
                at: Utc::now(),
            })
            .await;
            log::info!(
                target: "volunhub_auth",
                "msg=\"expired sessions swept\" count={count}"
            );
        }

        Ok(count)
    }
}
