//! The access guard: a router-wide middleware that enforces the
//! [`RolePolicy`](crate::policy::RolePolicy) before any handler runs.
//!
//! Each request moves through exactly one of three terminal states:
//! bypassed (exempt or open route), authenticated (principal attached to
//! the request), or rejected. A rejection is a redirect to the login page
//! for missing/invalid credentials and a `403` for a live principal whose
//! role the matched rule does not allow.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use super::cookie::extract_session_token;
use super::middleware::client_meta;
use super::routes::AppState;
use super::types::ErrorResponse;
use crate::policy::RouteClass;
use crate::principal::{Principal, ProfileRepository};
use crate::session::SessionStore;
use crate::AuthError;

/// Why the guard turned a request away.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// No usable credential; send the client to the login page, carrying
    /// the original target so it can resume after signing in.
    SignIn { next: String },
    /// Authenticated, but the role is not in the rule's allow-set.
    Denied,
}

/// Terminal state of a guard evaluation. Split from the middleware so the
/// decision logic is testable without a running router.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Exempt or open route; the guard never looked at credentials.
    Bypassed,
    Authenticated(Principal),
    Rejected(Rejection),
}

/// Evaluates the policy and session state for one request.
///
/// Generic over the body type so the future can be `Send` even though
/// axum's `Body` is not `Sync` (the guard only reads the URI and headers).
pub async fn evaluate<P, S, B>(
    state: &AppState<P, S>,
    request: &Request<B>,
) -> GuardOutcome
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
    B: Sync,
{
    let path = request.uri().path();

    let rule = match state.policy.classify(path) {
        RouteClass::Exempt | RouteClass::Open => return GuardOutcome::Bypassed,
        RouteClass::Protected(rule) => rule,
    };

    let name = &state.manager.config().cookie.name;
    let Some(token) = extract_session_token(request.headers(), name) else {
        return GuardOutcome::Rejected(Rejection::SignIn {
            next: original_target(request),
        });
    };

    let meta = client_meta(request.headers());
    let principal = match state.manager.validate(&token, &meta).await {
        Ok(principal) => principal,
        Err(_) => {
            return GuardOutcome::Rejected(Rejection::SignIn {
                next: original_target(request),
            });
        }
    };

    if rule.allows(principal.role) {
        GuardOutcome::Authenticated(principal)
    } else {
        log::info!(
            target: "volunhub_auth",
            "msg=\"access denied\" principal_id={} role={} path={path}",
            principal.id,
            principal.role
        );
        GuardOutcome::Rejected(Rejection::Denied)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`, layered over the
/// whole router.
pub async fn access_guard<P, S>(
    State(state): State<AppState<P, S>>,
    request: Request,
    next: Next,
) -> Response
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    // Evaluate against the bodyless parts: `&Request<Body>` is not `Send`
    // (the body is `!Sync`), and axum requires a `Send` future here.
    let (parts, body) = request.into_parts();
    let outcome = evaluate(&state, &Request::from_parts(parts.clone(), ())).await;
    let mut request = Request::from_parts(parts, body);
    match outcome {
        GuardOutcome::Bypassed => next.run(request).await,
        GuardOutcome::Authenticated(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        GuardOutcome::Rejected(rejection) => {
            rejection_response(&state.manager.config().login_path, rejection)
        }
    }
}

/// Path plus query of the request, for the `next` parameter.
fn original_target<B>(request: &Request<B>) -> String {
    request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), |pq| pq.as_str().to_owned())
}

fn rejection_response(login_path: &str, rejection: Rejection) -> Response {
    match rejection {
        Rejection::SignIn { next } => {
            let location = format!("{login_path}?next={}", urlencoding::encode(&next));
            // 303 so a POST to a protected route resumes as a GET
            Redirect::to(&location).into_response()
        }
        Rejection::Denied => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::from(AuthError::Forbidden)),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::config::AuthConfig;
    use crate::crypto::{Argon2Hasher, PasswordHasher as _, SecretString};
    use crate::manager::SessionManager;
    use crate::policy::RolePolicy;
    use crate::principal::{MockProfileRepository, Profile, Role};
    use crate::session::{ClientMeta, InMemorySessionStore};

    const SECRET: &str = "test-signing-secret-32-bytes-long!!!";

    fn seeded_profiles(role: Role) -> MockProfileRepository {
        let hash = Argon2Hasher::default().hash("hunter2!").unwrap();
        let profiles = MockProfileRepository::new();
        profiles.push(Profile::mock(1, "vol@example.com", &hash, role));
        profiles
    }

    fn state_with(role: Role) -> AppState<MockProfileRepository, InMemorySessionStore> {
        let manager = SessionManager::new(
            seeded_profiles(role),
            InMemorySessionStore::new(),
            AuthConfig::new(SecretString::new(SECRET)),
        );
        AppState::new(manager, RolePolicy::standard())
    }

    async fn login(
        state: &AppState<MockProfileRepository, InMemorySessionStore>,
    ) -> String {
        state
            .manager
            .login(
                "vol@example.com",
                &SecretString::new("hunter2!"),
                &ClientMeta::default(),
            )
            .await
            .unwrap()
            .token
    }

    fn request(path: &str, cookie: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = cookie {
            builder = builder.header("cookie", format!("volunhub_session={token}"));
        }
        builder.body(()).unwrap()
    }

    #[tokio::test]
    async fn test_exempt_and_open_routes_bypass() {
        let state = state_with(Role::Volunteer);
        for path in ["/", "/assets/app.css", "/auth/login", "/about"] {
            let outcome = evaluate(&state, &request(path, None)).await;
            assert_eq!(outcome, GuardOutcome::Bypassed, "{path}");
        }
    }

    #[tokio::test]
    async fn test_missing_cookie_redirects_with_next() {
        let state = state_with(Role::Volunteer);
        let outcome = evaluate(&state, &request("/dashboard?tab=2", None)).await;

        assert_eq!(
            outcome,
            GuardOutcome::Rejected(Rejection::SignIn {
                next: "/dashboard?tab=2".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn test_valid_session_authenticates() {
        let state = state_with(Role::Volunteer);
        let token = login(&state).await;

        let outcome = evaluate(&state, &request("/dashboard", Some(&token))).await;
        match outcome {
            GuardOutcome::Authenticated(principal) => {
                assert_eq!(principal.role, Role::Volunteer);
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_role_is_denied_not_redirected() {
        let state = state_with(Role::Volunteer);
        let token = login(&state).await;

        let outcome = evaluate(&state, &request("/admin/users", Some(&token))).await;
        assert_eq!(outcome, GuardOutcome::Rejected(Rejection::Denied));
    }

    #[tokio::test]
    async fn test_revoked_session_redirects() {
        let state = state_with(Role::Admin);
        let token = login(&state).await;
        state.manager.logout_by_token(&token).await.unwrap();

        let outcome = evaluate(&state, &request("/admin", Some(&token))).await;
        assert!(matches!(
            outcome,
            GuardOutcome::Rejected(Rejection::SignIn { .. })
        ));
    }

    #[tokio::test]
    async fn test_garbage_cookie_redirects() {
        let state = state_with(Role::Admin);
        let outcome = evaluate(&state, &request("/admin", Some("not-a-token"))).await;
        assert!(matches!(
            outcome,
            GuardOutcome::Rejected(Rejection::SignIn { .. })
        ));
    }

    #[test]
    fn test_rejection_response_shapes() {
        let response = rejection_response("/auth/login", Rejection::SignIn {
            next: "/admin/users?page=2".to_owned(),
        });
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/auth/login?next=%2Fadmin%2Fusers%3Fpage%3D2");

        let response = rejection_response("/auth/login", Rejection::Denied);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_expired_ttl_redirects() {
        let config = AuthConfig {
            session_ttl: Duration::hours(-1),
            ..AuthConfig::new(SecretString::new(SECRET))
        };
        let manager = SessionManager::new(
            seeded_profiles(Role::Volunteer),
            InMemorySessionStore::new(),
            config,
        );
        let state = AppState::new(manager, RolePolicy::standard());
        let token = login(&state).await;

        let outcome = evaluate(&state, &request("/dashboard", Some(&token))).await;
        assert!(matches!(
            outcome,
            GuardOutcome::Rejected(Rejection::SignIn { .. })
        ));
    }
}
