use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::cookie::extract_session_token;
use super::error::AppError;
use super::routes::AppState;
use crate::principal::{Principal, ProfileRepository};
use crate::session::{ClientMeta, SessionStore};
use crate::AuthError;

/// Extractor for the authenticated principal.
///
/// When the request passed through the access guard the principal is
/// already in the request extensions and no store access happens here.
/// Outside guarded routes the extractor validates the session cookie
/// itself, so handlers can opt into authentication piecemeal.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl CurrentPrincipal {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

/// Client metadata from request headers, recorded on the session row.
pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    ClientMeta { ip, user_agent }
}

impl<P, S> FromRequestParts<AppState<P, S>> for CurrentPrincipal
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<P, S>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(CurrentPrincipal(principal.clone()));
        }

        let name = &state.manager.config().cookie.name;
        let token = extract_session_token(&parts.headers, name)
            .ok_or(AppError(AuthError::Unauthenticated))?;

        let meta = client_meta(&parts.headers);
        let principal = state.manager.validate(&token, &meta).await.map_err(AppError)?;

        Ok(CurrentPrincipal(principal))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_client_meta_first_forwarded_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("volunhub-test/1.0"));

        let meta = client_meta(&headers);
        assert_eq!(meta.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(meta.user_agent.as_deref(), Some("volunhub-test/1.0"));
    }

    #[test]
    fn test_client_meta_absent_headers() {
        let meta = client_meta(&HeaderMap::new());
        assert!(meta.ip.is_none());
        assert!(meta.user_agent.is_none());
    }
}
