//! HTTP handlers for the authentication endpoints.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::cookie::{clear_session_cookie, extract_session_token, session_cookie};
use super::error::AppError;
use super::middleware::{client_meta, CurrentPrincipal};
use super::routes::AppState;
use super::types::{
    LoginRequest, LoginResponse, MessageResponse, PrincipalResponse, SessionInfoResponse,
};
use crate::crypto::SecretString;
use crate::principal::ProfileRepository;
use crate::session::SessionStore;
use crate::validators::is_valid_email;
use crate::AuthError;

/// Authenticate and open a session.
///
/// POST /auth/login
///
/// On success the credential is installed as an `HttpOnly` cookie; the
/// body confirms the principal and the session's expiry. Every failure
/// reason renders the same `401` body.
pub async fn login<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    if !is_valid_email(&body.email) {
        // skip the store lookup; renders identically to a failed login
        log::info!(
            target: "volunhub_auth",
            "msg=\"login rejected\" reason=\"malformed email\""
        );
        return Err(AppError(AuthError::UnknownPrincipal));
    }

    let password = SecretString::new(&body.password);
    let meta = client_meta(&headers);

    let grant = state.manager.login(&body.email, &password, &meta).await?;

    let config = state.manager.config();
    let cookie = session_cookie(&config.cookie, &grant.token, config.session_ttl);

    let body = LoginResponse {
        principal: PrincipalResponse::from(grant.principal),
        session_id: grant.session.id,
        expires_at: grant.session.expires_at,
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// Revoke the current session and clear the cookie.
///
/// POST /auth/logout
///
/// Idempotent: a missing cookie or an already revoked session still
/// succeeds and still clears the cookie.
pub async fn logout<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let config = state.manager.config();

    if let Some(token) = extract_session_token(&headers, &config.cookie.name) {
        state.manager.logout_by_token(&token).await?;
    }

    let cookie = clear_session_cookie(&config.cookie);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "signed out".to_owned(),
        }),
    ))
}

/// Introspect the presented session without touching its activity.
///
/// GET /auth/session
///
/// Always `200`; the body says whether the credential is backed by a
/// live session.
pub async fn session_info<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let name = &state.manager.config().cookie.name;
    let Some(token) = extract_session_token(&headers, name) else {
        return Json(SessionInfoResponse::inactive());
    };

    match state.manager.inspect(&token).await {
        Ok(record) => Json(SessionInfoResponse::from(record)),
        Err(_) => Json(SessionInfoResponse::inactive()),
    }
}

/// The authenticated principal behind the session cookie.
///
/// GET /auth/me
pub async fn current_principal<P, S>(
    principal: CurrentPrincipal,
) -> (StatusCode, Json<PrincipalResponse>)
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    (
        StatusCode::OK,
        Json(PrincipalResponse::from(principal.into_inner())),
    )
}
