use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ErrorResponse;
use crate::AuthError;

/// Converts [`AuthError`] into HTTP responses.
///
/// The body always carries the collapsed client message; the precise
/// failure reason stays in the server logs.
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse::from(self.0.clone());
        let status = match &self.0 {
            AuthError::UnknownPrincipal
            | AuthError::BadPassword
            | AuthError::AccountSuspended
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureMismatch
            | AuthError::TokenExpired
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::SigningError
            | AuthError::PasswordHashError
            | AuthError::ConfigurationError(_)
            | AuthError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(error_response)).into_response()
    }
}
