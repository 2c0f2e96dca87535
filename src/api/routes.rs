use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use crate::manager::SessionManager;
use crate::policy::RolePolicy;
use crate::principal::ProfileRepository;
use crate::session::SessionStore;

/// Shared state for the auth endpoints and the access guard.
pub struct AppState<P, S> {
    pub manager: Arc<SessionManager<P, S>>,
    pub policy: Arc<RolePolicy>,
}

impl<P, S> AppState<P, S> {
    pub fn new(manager: SessionManager<P, S>, policy: RolePolicy) -> Self {
        Self {
            manager: Arc::new(manager),
            policy: Arc::new(policy),
        }
    }
}

// manual impl so P and S themselves need not be Clone
impl<P, S> Clone for AppState<P, S> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            policy: Arc::clone(&self.policy),
        }
    }
}

/// Authentication endpoints, intended to be nested under `/auth`.
///
/// `POST /login` and `POST /logout` manage the session cookie;
/// `GET /session` introspects it; `GET /me` returns the authenticated
/// principal.
pub fn auth_routes<P, S>() -> Router<AppState<P, S>>
where
    P: ProfileRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<P, S>))
        .route("/logout", post(handlers::logout::<P, S>))
        .route("/session", get(handlers::session_info::<P, S>))
        .route("/me", get(handlers::current_principal::<P, S>))
}
