//! Axum HTTP integration: auth endpoints, the access guard, and the
//! authenticated-principal extractor.
//!
//! Enable with the `axum_api` feature.
//!
//! # Assembly
//!
//! ```rust,ignore
//! use volunhub::api::{access_guard, auth_routes, AppState};
//!
//! let state = AppState::new(manager, policy);
//! let app = axum::Router::new()
//!     .nest("/auth", auth_routes())
//!     .merge(page_routes)
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), access_guard))
//!     .with_state(state);
//! ```

pub mod cookie;
mod error;
mod guard;
mod handlers;
mod middleware;
mod routes;
pub mod types;

pub use error::AppError;
pub use guard::{access_guard, evaluate, GuardOutcome, Rejection};
pub use middleware::{client_meta, CurrentPrincipal};
pub use routes::{auth_routes, AppState};
pub use types::ErrorResponse;
